//! C5: Semantic Matcher — aligns resume skills to job skills through an
//! exact → fuzzy → optional-semantic cascade, then derives missing/extra
//! skill sets and three similarity measures (§4.5).

use crate::backends::EmbeddingBackend;
use crate::models::{MatchType, ParsedJobDescription, SemanticMatchResult, SkillMatch, SkillProfile};
use crate::textsim;
use std::collections::{HashMap, HashSet};

const FUZZY_THRESHOLD: f64 = 85.0;
const SEMANTIC_THRESHOLD: f64 = 0.70;
const EMBEDDING_CHAR_LIMIT: usize = 2000;

/// Sørensen-style token-sort-ratio: lowercase, split on whitespace, sort
/// tokens, rejoin, and run a normalized Levenshtein ratio over the result
/// (the same token-order-insensitive comparison `fuzzywuzzy.token_sort_ratio`
/// performs).
fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let sort = |s: &str| {
        let mut tokens: Vec<&str> = s.to_lowercase().split_whitespace().collect();
        tokens.sort_unstable();
        tokens.join(" ")
    };
    let sorted_a = sort(a);
    let sorted_b = sort(b);
    strsim::normalized_levenshtein(&sorted_a, &sorted_b) * 100.0
}

struct Cascade<'a> {
    resume_skills: &'a [String],
    used_resume: HashSet<String>,
}

impl<'a> Cascade<'a> {
    fn new(resume_skills: &'a [String]) -> Self {
        Self {
            resume_skills,
            used_resume: HashSet::new(),
        }
    }

    fn available(&self) -> impl Iterator<Item = &'a String> + '_ {
        self.resume_skills
            .iter()
            .filter(move |s| !self.used_resume.contains(&s.to_lowercase()))
    }

    fn claim(&mut self, resume_skill: &str) {
        self.used_resume.insert(resume_skill.to_lowercase());
    }
}

fn exact_pass(cascade: &mut Cascade, jd_skills: &[String]) -> (Vec<SkillMatch>, Vec<String>) {
    let mut matches = Vec::new();
    let mut unmatched = Vec::new();
    for jd_skill in jd_skills {
        let found = cascade
            .available()
            .find(|r| r.to_lowercase() == jd_skill.to_lowercase())
            .cloned();
        match found {
            Some(resume_skill) => {
                cascade.claim(&resume_skill);
                matches.push(SkillMatch {
                    skill_name: jd_skill.clone(),
                    resume_skill: Some(resume_skill),
                    jd_skill: jd_skill.clone(),
                    match_type: MatchType::Exact,
                    confidence: 1.0,
                    semantic_similarity: None,
                });
            }
            None => unmatched.push(jd_skill.clone()),
        }
    }
    (matches, unmatched)
}

fn fuzzy_pass(cascade: &mut Cascade, jd_skills: &[String]) -> (Vec<SkillMatch>, Vec<String>) {
    let mut matches = Vec::new();
    let mut unmatched = Vec::new();
    for jd_skill in jd_skills {
        let best = cascade
            .available()
            .map(|r| (r.clone(), token_sort_ratio(r, jd_skill)))
            .filter(|(_, ratio)| *ratio >= FUZZY_THRESHOLD)
            .fold(None::<(String, f64)>, |acc, candidate| match acc {
                Some((_, best_ratio)) if best_ratio >= candidate.1 => acc,
                _ => Some(candidate),
            });

        match best {
            Some((resume_skill, ratio)) => {
                cascade.claim(&resume_skill);
                matches.push(SkillMatch {
                    skill_name: jd_skill.clone(),
                    resume_skill: Some(resume_skill),
                    jd_skill: jd_skill.clone(),
                    match_type: MatchType::Fuzzy,
                    confidence: ratio / 100.0,
                    semantic_similarity: None,
                });
            }
            None => unmatched.push(jd_skill.clone()),
        }
    }
    (matches, unmatched)
}

fn semantic_pass(
    cascade: &mut Cascade,
    jd_skills: &[String],
    embedding: &dyn EmbeddingBackend,
) -> (Vec<SkillMatch>, Vec<String>) {
    let mut matches = Vec::new();
    let mut unmatched = Vec::new();

    let resume_candidates: Vec<String> = cascade.available().cloned().collect();
    if resume_candidates.is_empty() || jd_skills.is_empty() {
        return (Vec::new(), jd_skills.to_vec());
    }

    let resume_vectors = embedding.embed(&resume_candidates);
    let jd_vectors = embedding.embed(&jd_skills.to_vec());

    for (jd_skill, jd_vec) in jd_skills.iter().zip(jd_vectors.iter()) {
        let best = resume_candidates
            .iter()
            .zip(resume_vectors.iter())
            .filter(|(r, _)| !cascade.used_resume.contains(&r.to_lowercase()))
            .map(|(r, v)| (r.clone(), cosine(jd_vec, v)))
            .filter(|(_, sim)| *sim >= SEMANTIC_THRESHOLD)
            .fold(None::<(String, f64)>, |acc, candidate| match acc {
                Some((_, best_sim)) if best_sim >= candidate.1 => acc,
                _ => Some(candidate),
            });

        match best {
            Some((resume_skill, similarity)) => {
                cascade.claim(&resume_skill);
                matches.push(SkillMatch {
                    skill_name: jd_skill.clone(),
                    resume_skill: Some(resume_skill),
                    jd_skill: jd_skill.clone(),
                    match_type: MatchType::Semantic,
                    confidence: similarity,
                    semantic_similarity: Some(similarity),
                });
            }
            None => unmatched.push(jd_skill.clone()),
        }
    }

    (matches, unmatched)
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)) as f64
    }
}

fn jaccard_category(resume_terms: &[String], jd_terms: &[String]) -> f64 {
    let a: HashSet<String> = resume_terms.iter().map(|s| s.to_lowercase()).collect();
    let b: HashSet<String> = jd_terms.iter().map(|s| s.to_lowercase()).collect();
    textsim::jaccard_similarity(&a, &b)
}

/// `Match(profile, parsed_jd, resume_text, jd_text) → SemanticMatchResult`
/// from the core API, with the semantic tier skipped when no embedding
/// backend is supplied.
pub fn match_skills(
    profile: &SkillProfile,
    parsed_jd: &ParsedJobDescription,
    resume_text: &str,
    jd_text: &str,
    embedding: Option<&dyn EmbeddingBackend>,
) -> SemanticMatchResult {
    let resume_skill_names = profile.all_skill_names();
    let jd_required = parsed_jd.required_skills.clone();

    let mut seen = HashSet::new();
    let all_jd_skills: Vec<String> = jd_required
        .iter()
        .chain(parsed_jd.preferred_skills.iter())
        .filter(|s| seen.insert(s.to_lowercase()))
        .cloned()
        .collect();

    let mut cascade = Cascade::new(&resume_skill_names);
    let (exact_matches, remaining) = exact_pass(&mut cascade, &all_jd_skills);
    let (fuzzy_matches, remaining) = fuzzy_pass(&mut cascade, &remaining);

    let (semantic_matches, still_missing) = match embedding {
        Some(backend) => semantic_pass(&mut cascade, &remaining, backend),
        None => (Vec::new(), remaining),
    };

    let mut skill_matches = exact_matches;
    skill_matches.extend(fuzzy_matches);
    skill_matches.extend(semantic_matches);

    let matched_resume: HashSet<String> = skill_matches
        .iter()
        .filter_map(|m| m.resume_skill.as_ref())
        .map(|s| s.to_lowercase())
        .collect();

    let required_set: HashSet<String> = jd_required.iter().map(|s| s.to_lowercase()).collect();
    let missing_skills: Vec<String> = still_missing
        .into_iter()
        .filter(|s| required_set.contains(&s.to_lowercase()))
        .collect();

    let additional_skills: Vec<String> = resume_skill_names
        .iter()
        .filter(|s| !matched_resume.contains(&s.to_lowercase()))
        .cloned()
        .collect();

    let mut category_similarities = HashMap::new();
    category_similarities.insert(
        "technical".to_string(),
        jaccard_category(&profile.technical_skills.iter().map(|s| s.name.clone()).collect::<Vec<_>>(), &jd_required),
    );
    let tool_jd_terms: Vec<String> = jd_required
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            lower.contains("cloud") || lower.contains("tool")
        })
        .cloned()
        .collect();
    category_similarities.insert(
        "tools".to_string(),
        jaccard_category(&profile.tools_platforms.iter().map(|s| s.name.clone()).collect::<Vec<_>>(), &tool_jd_terms),
    );

    let embedding_similarity = embedding
        .map(|backend| {
            let resume_clip: String = resume_text.chars().take(EMBEDDING_CHAR_LIMIT).collect();
            let jd_clip: String = jd_text.chars().take(EMBEDDING_CHAR_LIMIT).collect();
            let vectors = backend.embed(&[resume_clip, jd_clip]);
            match (vectors.first(), vectors.get(1)) {
                (Some(a), Some(b)) => cosine(a, b),
                _ => 0.0,
            }
        })
        .unwrap_or(0.0);

    let text_similarity = textsim::text_cosine_similarity(resume_text, jd_text);

    let required_count = jd_required.len();
    let required_matches: Vec<&SkillMatch> = skill_matches
        .iter()
        .filter(|m| required_set.contains(&m.jd_skill.to_lowercase()))
        .collect();
    let (coverage, weighted_coverage) = if required_count == 0 {
        (0.0, 0.0)
    } else {
        let coverage = required_matches.len() as f64 / required_count as f64;
        let weighted = required_matches.iter().map(|m| m.confidence).sum::<f64>() / required_count as f64;
        (coverage, weighted)
    };
    let skill_component = ((coverage + weighted_coverage) / 2.0).min(1.0);

    let overall_similarity =
        0.40 * skill_component + 0.35 * embedding_similarity + 0.25 * text_similarity;

    SemanticMatchResult {
        overall_similarity,
        skill_matches,
        missing_skills,
        additional_skills,
        category_similarities,
        embedding_similarity,
        text_similarity,
    }
}
