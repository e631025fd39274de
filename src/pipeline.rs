//! `run_pipeline(...)`: the convenience entry point composing C1-C7 in
//! order (§6 supplement), grounded in the teacher's command-handler style
//! of wrapping a whole multi-stage flow in one function (`commands.rs`).

use crate::backends::Backends;
use crate::config::Weights;
use crate::document;
use crate::error::PipelineResult;
use crate::feedback;
use crate::job;
use crate::matcher;
use crate::models::{EvaluationResult, JobMetadata};
use crate::resume;
use crate::scoring;

/// Runs the full C1→C7 pipeline for one (resume, job) pair. `weights`
/// defaults when `None`; invalid weights surface as `PipelineError::InvalidWeights`.
pub fn run_pipeline(
    resume_bytes: &[u8],
    resume_mime: &str,
    jd_text: &str,
    jd_metadata: &JobMetadata,
    weights: Option<Weights>,
    backends: &Backends,
) -> PipelineResult<EvaluationResult> {
    let weights = weights.unwrap_or_default();
    let thresholds = crate::config::Thresholds::default();

    log::debug!("extracting resume document ({} bytes, {})", resume_bytes.len(), resume_mime);
    let (resume_text, confidence) = document::extract(resume_bytes, resume_mime)?;

    log::debug!("structuring resume and job description");
    let parsed_resume = match backends.nlp {
        Some(nlp) => {
            let mut parsed = resume::structure(&resume_text, confidence);
            parsed.skills = crate::skills::extract_skills_with_backend(&resume_text, nlp);
            parsed
        }
        None => resume::structure(&resume_text, confidence),
    };
    let parsed_job = job::structure(jd_text, jd_metadata);

    log::debug!("matching resume skills against job requirements");
    let match_result = matcher::match_skills(
        &parsed_resume.skills,
        &parsed_job,
        &resume_text,
        jd_text,
        backends.embedding,
    );

    log::debug!("scoring evaluation");
    let score = scoring::score(&parsed_resume, &parsed_job, &match_result, &weights, &thresholds)?;

    log::debug!("synthesizing feedback");
    let feedback = feedback::build_feedback_with_llm(&parsed_resume, &score, &match_result, &parsed_job, backends.llm);

    Ok(EvaluationResult {
        parsed_resume,
        parsed_job,
        match_result,
        score,
        feedback,
    })
}
