//! Heuristic resume segmentation.
//!
//! Takes the flat text an extractor recovered and classifies it into a
//! structured record: profile fields by pattern matching, sections by
//! keyword-delimited slicing, and per-section entries by a small
//! line-accumulation state machine. Everything here is rule-based and
//! deterministic; a miss produces a placeholder, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{
    EducationEntry, ExperienceEntry, ParsedResume, Profile, placeholder_skills,
};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").expect("Invalid email regex"));

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d()\s.-]{7,}\d").expect("Invalid phone regex"));

/// Loose geographic hint: a two-letter region code after a comma, or a
/// country name common on resumes. Best effort, not geocoding.
static LOCATION_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i),\s*[A-Za-z]{2}|USA|United States|Canada|UK|India")
        .expect("Invalid location regex")
});

/// Date line marker: any standalone 4-digit year.
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").expect("Invalid year regex"));

/// Splits "2019 - 2022", "2019–2022", "2019 to Present" style ranges.
static DATE_RANGE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)–|-|to").expect("Invalid date split regex"));

/// Splits "Role at Company", "Role @ Company", "Role - Company".
static ROLE_COMPANY_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+at\s+|\s+@\s+|\s+-\s+").expect("Invalid headline split regex")
});

static BULLET_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-•]\s*").expect("Invalid bullet regex"));

static EXPERIENCE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(experience|work experience|professional experience)$")
        .expect("Invalid experience heading regex")
});

static EDUCATION_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^education$").expect("Invalid education heading regex"));

/// Skill token separators when no comma is present: wide gaps, spaced
/// bullets, slashes, pipes.
static SKILL_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}|\s•\s|/|\|").expect("Invalid skill split regex"));

/// How the block accumulators react to one line of a bounded section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    /// A `-` or `•` item: accumulated with the marker stripped.
    Bullet,
    /// A bare section heading repeated inside its own section: flushes the
    /// open block.
    SectionHeading,
    /// Anything else (entry headlines and date lines included): accumulated
    /// as-is.
    Plain,
}

fn classify(line: &str, heading: &Regex) -> LineKind {
    if heading.is_match(line) {
        LineKind::SectionHeading
    } else if line.starts_with('-') || line.starts_with('•') {
        LineKind::Bullet
    } else {
        LineKind::Plain
    }
}

/// Segments extracted resume text into a structured record.
///
/// Pure and deterministic: identical input text always produces a
/// field-for-field identical record. Empty or unrecognizable input yields
/// the documented placeholder entries rather than failing.
pub fn segment(text: &str) -> ParsedResume {
    let lines = split_lines(text);

    let email = first_match(&EMAIL, text);
    let phone = first_match(&PHONE, text);
    let name = lines
        .first()
        .cloned()
        .unwrap_or_else(|| "Your Name".to_string());
    let headline = match lines.get(1) {
        Some(line) if !EMAIL.is_match(line) => line.clone(),
        _ => "Professional".to_string(),
    };
    let location = lines
        .iter()
        .find(|line| LOCATION_HINT.is_match(line))
        .cloned()
        .unwrap_or_default();

    let experience_lines = extract_section(
        &lines,
        &["experience", "professional experience", "work experience"],
        &["education", "skills", "projects"],
    );
    let education_lines = extract_section(
        &lines,
        &["education"],
        &["experience", "skills", "projects"],
    );
    let skills_lines = extract_section(
        &lines,
        &["skills", "technical skills"],
        &["experience", "education", "projects"],
    );

    let mut experience = parse_experience(&experience_lines);
    let mut education = parse_education(&education_lines);
    let mut skills = parse_skills(&skills_lines);

    if experience.is_empty() {
        experience.push(ExperienceEntry::placeholder());
    }
    if education.is_empty() {
        education.push(EducationEntry::placeholder());
    }
    if skills.is_empty() {
        skills = placeholder_skills();
    }

    ParsedResume {
        profile: Profile {
            name,
            headline,
            location,
            email,
            phone,
        },
        experience,
        education,
        skills,
    }
}

/// Splits text into trimmed, non-empty lines, preserving order.
fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Slices the lines strictly between the first start-keyword line and the
/// next end-keyword line (to end-of-document when no end keyword follows).
///
/// Keyword matching is lowercase substring containment, so overlapping or
/// double-counted sections are possible with ambiguous headings — an
/// accepted limitation of the heuristic.
fn extract_section(lines: &[String], start_keywords: &[&str], end_keywords: &[&str]) -> Vec<String> {
    let start = match lines
        .iter()
        .position(|line| contains_any(line, start_keywords))
    {
        Some(index) => index,
        None => return Vec::new(),
    };

    let end = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| contains_any(line, end_keywords))
        .map(|(index, _)| index)
        .unwrap_or(lines.len());

    lines[start + 1..end].to_vec()
}

fn contains_any(line: &str, keywords: &[&str]) -> bool {
    let lower = line.to_lowercase();
    keywords.iter().any(|keyword| lower.contains(keyword))
}

/// Groups experience lines into entry blocks and flushes each into an entry.
///
/// A repeated section heading closes the open block; the heading line itself
/// then seeds the next block, matching the tolerant behavior this heuristic
/// has always had for resumes with stacked headings.
fn parse_experience(lines: &[String]) -> Vec<ExperienceEntry> {
    let mut entries = Vec::new();
    let mut block: Vec<String> = Vec::new();

    for line in lines {
        match classify(line, &EXPERIENCE_HEADING) {
            LineKind::SectionHeading => {
                if !block.is_empty() {
                    flush_experience(&mut entries, &mut block);
                }
                block.push(line.clone());
            }
            LineKind::Bullet => block.push(strip_bullet(line)),
            LineKind::Plain => block.push(line.clone()),
        }
    }
    flush_experience(&mut entries, &mut block);
    entries
}

fn flush_experience(entries: &mut Vec<ExperienceEntry>, block: &mut Vec<String>) {
    if block.is_empty() {
        return;
    }

    let headline = block[0].clone();
    let rest = &block[1..];

    let parts: Vec<&str> = ROLE_COMPANY_SPLIT.split(&headline).collect();
    let role = parts.first().copied().unwrap_or("");
    let company = parts.get(1).copied().unwrap_or("");

    let date_line = rest
        .iter()
        .find(|line| YEAR.is_match(line))
        .cloned()
        .unwrap_or_default();
    let (start_date, end_date) = split_date_range(&date_line);

    let highlights: Vec<String> = rest
        .iter()
        .filter(|line| **line != date_line)
        .map(|line| strip_bullet(line).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    entries.push(ExperienceEntry {
        id: (entries.len() + 1).to_string(),
        company: if company.is_empty() {
            headline.clone()
        } else {
            company.to_string()
        },
        role: if role.is_empty() {
            "Role".to_string()
        } else {
            role.to_string()
        },
        start_date,
        end_date,
        highlights: if highlights.is_empty() {
            vec!["Describe your impact".to_string()]
        } else {
            highlights
        },
    });
    block.clear();
}

/// Groups education lines into entry blocks.
///
/// Unlike experience, a repeated `education` heading is consumed by the
/// flush it triggers; it only seeds a block when none is open.
fn parse_education(lines: &[String]) -> Vec<EducationEntry> {
    let mut entries = Vec::new();
    let mut block: Vec<String> = Vec::new();

    for line in lines {
        match classify(line, &EDUCATION_HEADING) {
            LineKind::Bullet => block.push(strip_bullet(line)),
            LineKind::SectionHeading if !block.is_empty() => {
                flush_education(&mut entries, &mut block);
            }
            LineKind::SectionHeading | LineKind::Plain => block.push(line.clone()),
        }
    }
    flush_education(&mut entries, &mut block);
    entries
}

fn flush_education(entries: &mut Vec<EducationEntry>, block: &mut Vec<String>) {
    if block.is_empty() {
        return;
    }

    let school = block
        .first()
        .cloned()
        .unwrap_or_else(|| "Institution".to_string());
    let degree = block
        .get(1)
        .cloned()
        .unwrap_or_else(|| "Degree".to_string());
    let date_line = block
        .iter()
        .find(|line| YEAR.is_match(line))
        .cloned()
        .unwrap_or_default();
    let (start_date, end_date) = split_date_range(&date_line);

    entries.push(EducationEntry {
        id: (entries.len() + 1).to_string(),
        school,
        degree,
        start_date,
        end_date,
    });
    block.clear();
}

/// Tokenizes the bounded skills lines.
///
/// A comma anywhere makes the whole section comma-separated; otherwise each
/// line is bullet-stripped and split on gap/bullet/slash/pipe separators.
fn parse_skills(lines: &[String]) -> Vec<String> {
    if lines.is_empty() {
        return Vec::new();
    }

    let combined = lines.join(" ");
    if combined.contains(',') {
        return combined
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from)
            .collect();
    }

    lines
        .iter()
        .flat_map(|line| {
            let stripped = strip_bullet(line);
            SKILL_SPLIT
                .split(&stripped)
                .map(|token| token.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Splits a free-text date line on dash/en-dash/"to" into (start, end).
/// Either half may come back empty; nothing is validated as a date.
fn split_date_range(date_line: &str) -> (String, String) {
    let mut parts = DATE_RANGE_SPLIT.split(date_line);
    let start = parts.next().unwrap_or("").trim().to_string();
    let end = parts.next().unwrap_or("").trim().to_string();
    (start, end)
}

fn strip_bullet(line: &str) -> String {
    BULLET_PREFIX.replace(line, "").into_owned()
}

fn first_match(pattern: &Regex, text: &str) -> String {
    pattern
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
