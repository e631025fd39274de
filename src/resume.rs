//! C2: Resume Structurer — segments resume text into sections and extracts
//! contact info, skills, education, work history, projects, certifications,
//! languages, awards, and total years of experience. Never fails: missing
//! sections simply yield empty slices (§4.2).

use crate::models::{ContactInfo, EducationEntry, ParsedResume, ProjectEntry, WorkExperienceEntry};
use crate::skills;
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap());
static LINKEDIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(https?://)?(www\.)?linkedin\.com/in/[\w-]+").unwrap());
static GITHUB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(https?://)?(www\.)?github\.com/[\w-]+").unwrap());
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)https?://\S+").unwrap());

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(bachelor[^,\n]*|master[^,\n]*|phd[^,\n]*|associate[^,\n]*|diploma[^,\n]*|b\.?[as]\.?|m\.?[as]\.?|mba)\b").unwrap()
});
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());
static GPA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)gpa:?\s*(\d+\.?\d*)").unwrap());
static CAP_WORD_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][a-zA-Z&.,'-]*(?:\s+[A-Z][a-zA-Z&.,'-]*)*)\b").unwrap());

static WORK_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][\w\s,.&-]*\s+(at|@|-|\|)\s+.+").unwrap());
static DATE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2}/\d{4}|jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?\.?\s+\d{4}|\b(19|20)\d{2}\b)").unwrap()
});

const RESUME_LEVEL_WORDS: [&str; 4] = ["resume", "cv", "profile", "summary"];

struct Section {
    lines: Vec<String>,
}

fn section_keywords() -> HashMap<&'static str, &'static [&'static str]> {
    let mut map: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    map.insert("summary", &["summary", "objective", "profile"]);
    map.insert("skills", &["skills", "technical skills", "technologies"]);
    map.insert(
        "experience",
        &["experience", "employment", "work history"],
    );
    map.insert("education", &["education", "academic"]);
    map.insert("projects", &["projects"]);
    map.insert("certifications", &["certifications", "licenses"]);
    map.insert("languages", &["languages"]);
    map.insert("awards", &["awards", "honors"]);
    map
}

/// Splits text into named sections. A line qualifies as a header if it is
/// ≤4 words and contains one of the section's keywords; a section runs
/// until the next qualifying header of any kind.
fn detect_sections(text: &str) -> HashMap<&'static str, Section> {
    let keywords = section_keywords();
    let mut sections: HashMap<&'static str, Section> = HashMap::new();
    let mut current: Option<&'static str> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        let word_count = trimmed.split_whitespace().count();
        let lower = trimmed.to_lowercase();

        let mut matched_section = None;
        if word_count > 0 && word_count <= 4 {
            for (&name, kws) in keywords.iter() {
                if kws.iter().any(|kw| lower.contains(kw)) {
                    matched_section = Some(name);
                    break;
                }
            }
        }

        if let Some(name) = matched_section {
            current = Some(name);
            sections.entry(name).or_insert_with(|| Section { lines: Vec::new() });
            continue;
        }

        if let Some(name) = current {
            sections
                .entry(name)
                .or_insert_with(|| Section { lines: Vec::new() })
                .lines
                .push(trimmed.to_string());
        }
    }

    sections
}

fn extract_name(text: &str, contact_hit: &ContactInfo) -> Option<String> {
    for line in text.lines().take(5) {
        let trimmed = line.trim();
        let word_count = trimmed.split_whitespace().count();
        if !(2..=4).contains(&word_count) {
            continue;
        }
        if trimmed
            .split_whitespace()
            .next()
            .map(|w| w.chars().next().map(|c| c.is_uppercase()).unwrap_or(false))
            != Some(true)
        {
            continue;
        }
        let all_title_cased = trimmed.split_whitespace().all(|w| {
            w.chars()
                .next()
                .map(|c| c.is_uppercase())
                .unwrap_or(false)
        });
        if !all_title_cased {
            continue;
        }
        if EMAIL_RE.is_match(trimmed) || PHONE_RE.is_match(trimmed) || URL_RE.is_match(trimmed) {
            continue;
        }
        let lower = trimmed.to_lowercase();
        if RESUME_LEVEL_WORDS.iter().any(|w| lower.contains(w)) {
            continue;
        }
        let _ = contact_hit;
        return Some(trimmed.to_string());
    }
    None
}

fn extract_contact(text: &str) -> ContactInfo {
    let mut contact = ContactInfo::default();
    contact.email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());
    contact.phone = PHONE_RE.find(text).map(|m| m.as_str().to_string());
    contact.linkedin = LINKEDIN_RE.find(text).map(|m| m.as_str().to_string());
    contact.github = GITHUB_RE.find(text).map(|m| m.as_str().to_string());
    contact.name = extract_name(text, &contact);
    contact
}

fn split_skills_tokens(section_text: &str) -> Vec<String> {
    section_text
        .split(|c| c == ',' || c == ';' || c == '|' || c == '•' || c == '\n')
        .map(|t| t.trim().to_string())
        .filter(|t| {
            !t.is_empty() && t.split_whitespace().count() <= 3 && t.split_whitespace().count() > 0
        })
        .collect()
}

fn extract_education(lines: &[String]) -> Vec<EducationEntry> {
    let mut entries = Vec::new();
    let mut current: Vec<String> = Vec::new();

    let flush = |current: &mut Vec<String>, entries: &mut Vec<EducationEntry>| {
        if current.is_empty() {
            return;
        }
        let block = current.join(" ");
        let entry = parse_education_block(&block);
        if entry.degree.is_some() || entry.institution.is_some() {
            entries.push(entry);
        }
        current.clear();
    };

    for line in lines {
        if line.is_empty() {
            continue;
        }
        let starts_upper = line.chars().next().map(|c| c.is_uppercase()).unwrap_or(false);
        if starts_upper && !current.is_empty() {
            flush(&mut current, &mut entries);
        }
        current.push(line.clone());
    }
    flush(&mut current, &mut entries);

    entries
}

fn parse_education_block(block: &str) -> EducationEntry {
    let degree = DEGREE_RE.find(block).map(|m| m.as_str().trim().to_string());

    let institution = CAP_WORD_RUN_RE
        .find_iter(block)
        .map(|m| m.as_str())
        .filter(|s| s.split_whitespace().count() >= 2)
        .max_by_key(|s| s.len())
        .map(|s| s.to_string());

    let graduation_year = YEAR_RE
        .find_iter(block)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .max();

    let gpa = GPA_RE
        .captures(block)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok());

    EducationEntry {
        degree,
        institution,
        location: None,
        graduation_year,
        gpa,
        honors: Vec::new(),
    }
}

fn extract_work_experience(lines: &[String]) -> Vec<WorkExperienceEntry> {
    let mut entries = Vec::new();
    let mut current: Vec<String> = Vec::new();

    let flush = |current: &mut Vec<String>, entries: &mut Vec<WorkExperienceEntry>| {
        if current.is_empty() {
            return;
        }
        if let Some(entry) = parse_work_block(current) {
            entries.push(entry);
        }
        current.clear();
    };

    for line in lines {
        if line.is_empty() {
            continue;
        }
        if WORK_HEADER_RE.is_match(line) && !current.is_empty() {
            flush(&mut current, &mut entries);
        }
        current.push(line.clone());
    }
    flush(&mut current, &mut entries);

    entries
}

fn parse_work_block(lines: &[String]) -> Option<WorkExperienceEntry> {
    let first = lines.first()?;
    let separators = [" at ", " @ ", " - ", " | "];
    let mut title = first.clone();
    let mut company = String::new();
    for sep in separators {
        if let Some((left, right)) = first.split_once(sep) {
            title = left.trim().to_string();
            company = right.trim().to_string();
            break;
        }
    }
    if title.is_empty() || company.is_empty() {
        return None;
    }

    let header_block = lines.iter().take(3).cloned().collect::<Vec<_>>().join(" ");
    let date_tokens: Vec<String> = DATE_TOKEN_RE
        .find_iter(&header_block)
        .map(|m| m.as_str().to_string())
        .collect();
    let start_date = date_tokens.first().cloned();
    let end_date = date_tokens.get(1).cloned().or_else(|| Some("Present".to_string()));

    let mut description = Vec::new();
    for line in lines.iter().skip(1) {
        let cleaned = line.trim_start_matches(['•', '-', '*']).trim();
        if !cleaned.is_empty() {
            description.push(cleaned.to_string());
        }
    }

    let technologies = description
        .iter()
        .flat_map(|d| skills::extract_skills(d).all_skill_names())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();

    Some(WorkExperienceEntry {
        title,
        company,
        location: None,
        start_date,
        end_date,
        description: description.clone(),
        technologies,
        achievements: description,
    })
}

/// Years between a start and end token, treating "Present" as the current
/// year. Negative spans clamp to 0.
fn entry_years(start: &Option<String>, end: &Option<String>, current_year: i32) -> f64 {
    let start_year = start.as_ref().and_then(|s| extract_year(s)).unwrap_or(current_year);
    let end_year = match end.as_deref() {
        Some("Present") | None => current_year,
        Some(other) => extract_year(other).unwrap_or(current_year),
    };
    (end_year - start_year).max(0) as f64
}

fn extract_year(token: &str) -> Option<i32> {
    YEAR_RE.find(token).and_then(|m| m.as_str().parse().ok())
}

fn extract_projects(lines: &[String]) -> Vec<ProjectEntry> {
    let mut entries = Vec::new();
    let mut current: Vec<String> = Vec::new();

    let flush = |current: &mut Vec<String>, entries: &mut Vec<ProjectEntry>| {
        if current.is_empty() {
            return;
        }
        entries.push(parse_project_block(current));
        current.clear();
    };

    for line in lines {
        if line.is_empty() {
            continue;
        }
        let starts_upper = line.chars().next().map(|c| c.is_uppercase()).unwrap_or(false);
        if starts_upper && !current.is_empty() {
            flush(&mut current, &mut entries);
        }
        current.push(line.clone());
    }
    flush(&mut current, &mut entries);

    entries
}

fn parse_project_block(lines: &[String]) -> ProjectEntry {
    let first = lines.first().cloned().unwrap_or_default();
    let (title, inline_tech) = if let Some((l, r)) = first
        .split_once(" - ")
        .or_else(|| first.split_once(" | "))
    {
        (l.trim().to_string(), Some(r.trim().to_string()))
    } else {
        (first.trim().to_string(), None)
    };

    let url = URL_RE.find(&lines.join(" ")).map(|m| m.as_str().to_string());

    let mut description = Vec::new();
    let mut technologies: Vec<String> = inline_tech
        .map(|t| split_skills_tokens(&t))
        .unwrap_or_default();

    for line in lines.iter().skip(1) {
        if let Some(rest) = line
            .to_lowercase()
            .strip_prefix("technologies:")
            .map(|_| ())
        {
            let _ = rest;
            if let Some(idx) = line.to_lowercase().find("technologies:") {
                let tech_part = &line[idx + "technologies:".len()..];
                technologies.extend(split_skills_tokens(tech_part));
                continue;
            }
        }
        let cleaned = line.trim_start_matches(['•', '-', '*']).trim();
        if !cleaned.is_empty() {
            description.push(cleaned.to_string());
        }
    }

    ProjectEntry {
        title,
        description,
        technologies,
        url,
        start_date: None,
        end_date: None,
    }
}

fn flat_bullets(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.trim_start_matches(['•', '-', '*']).trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// `StructureResume(text, confidence) → ParsedResume` from the core API.
pub fn structure(text: &str, confidence: f64) -> ParsedResume {
    structure_at_year(text, confidence, current_year())
}

/// Testable variant that takes the "current year" explicitly so date-math
/// tests stay deterministic without depending on wall-clock time.
pub fn structure_at_year(text: &str, confidence: f64, current_year: i32) -> ParsedResume {
    let sections = detect_sections(text);
    let contact = extract_contact(text);

    let summary = sections.get("summary").map(|s| s.lines.join(" ")).filter(|s| !s.is_empty());

    // The dictionary strategy scans the whole document, so every canonical
    // skill mentioned in the skills section is already picked up here.
    let skills = skills::extract_skills(text);

    let education = sections
        .get("education")
        .map(|s| extract_education(&s.lines))
        .unwrap_or_default();

    let work_experience = sections
        .get("experience")
        .map(|s| extract_work_experience(&s.lines))
        .unwrap_or_default();

    let total_months: f64 = work_experience
        .iter()
        .map(|e| entry_years(&e.start_date, &e.end_date, current_year) * 12.0)
        .sum();
    let total_experience_years = if work_experience.is_empty() {
        None
    } else {
        Some((total_months / 12.0 * 10.0).round() / 10.0)
    };

    let projects = sections
        .get("projects")
        .map(|s| extract_projects(&s.lines))
        .unwrap_or_default();

    let certifications = sections
        .get("certifications")
        .map(|s| flat_bullets(&s.lines))
        .unwrap_or_else(|| skills.certifications.clone());

    let languages = sections
        .get("languages")
        .map(|s| flat_bullets(&s.lines))
        .unwrap_or_default();

    let awards = sections.get("awards").map(|s| flat_bullets(&s.lines)).unwrap_or_default();

    ParsedResume {
        contact,
        summary,
        skills,
        education,
        work_experience,
        projects,
        certifications,
        languages,
        awards,
        total_experience_years,
        raw_text: text.to_string(),
        parsing_confidence: confidence,
    }
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Jane Doe\njane.doe@example.com | 555-123-4567\n\nSummary\nExperienced backend engineer.\n\nSkills\nPython, Django, PostgreSQL, Docker\n\nExperience\nSenior Engineer at Acme Corp\n01/2020 - Present\n- Built scalable APIs with Python and Django\n\nEducation\nMassachusetts Institute Of Technology\nBachelor of Science in Computer Science, 2015\nGPA: 3.8";

    #[test]
    fn extracts_contact_info() {
        let resume = structure(SAMPLE, 0.9);
        assert_eq!(resume.contact.email.as_deref(), Some("jane.doe@example.com"));
        assert!(resume.contact.phone.is_some());
    }

    #[test]
    fn extracts_name_from_header() {
        let resume = structure(SAMPLE, 0.9);
        assert_eq!(resume.contact.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn extracts_work_experience_with_present_end() {
        let resume = structure(SAMPLE, 0.9);
        assert_eq!(resume.work_experience.len(), 1);
        let entry = &resume.work_experience[0];
        assert_eq!(entry.title, "Senior Engineer");
        assert_eq!(entry.company, "Acme Corp");
        assert_eq!(entry.end_date.as_deref(), Some("Present"));
    }

    #[test]
    fn computes_total_years() {
        let resume = structure_at_year(SAMPLE, 0.9, 2024);
        assert_eq!(resume.total_experience_years, Some(4.0));
    }

    #[test]
    fn extracts_education_degree_and_gpa() {
        let resume = structure(SAMPLE, 0.9);
        assert_eq!(resume.education.len(), 1);
        let entry = &resume.education[0];
        assert!(entry.degree.as_deref().unwrap().to_lowercase().contains("bachelor"));
        assert_eq!(entry.gpa, Some(3.8));
        assert_eq!(entry.graduation_year, Some(2015));
    }

    #[test]
    fn empty_resume_yields_empty_sections() {
        let resume = structure("", 0.0);
        assert!(resume.education.is_empty());
        assert!(resume.work_experience.is_empty());
        assert_eq!(resume.total_experience_years, None);
    }

    #[test]
    fn idempotent_structuring() {
        let first = structure(SAMPLE, 0.9);
        let second = structure(SAMPLE, 0.9);
        assert_eq!(first, second);
    }
}
