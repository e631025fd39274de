use resumatch_core::models::JobMetadata;
use resumatch_core::{backends::Backends, run_pipeline, Config};
use std::fs;
use std::process::ExitCode;

fn guess_mime(path: &str) -> &'static str {
    let lower = path.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else if lower.ends_with(".doc") {
        "application/msword"
    } else {
        "text/plain"
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: resumatch <resume-file> <job-description-file>");
        return ExitCode::FAILURE;
    }

    let resume_path = &args[1];
    let jd_path = &args[2];

    let resume_bytes = match fs::read(resume_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("failed to read resume file {}: {}", resume_path, e);
            return ExitCode::FAILURE;
        }
    };

    let jd_text = match fs::read_to_string(jd_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("failed to read job description file {}: {}", jd_path, e);
            return ExitCode::FAILURE;
        }
    };

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("failed to load config, using defaults: {}", e);
        Config::default()
    });

    let mime = guess_mime(resume_path);
    let backends = Backends::default();

    match run_pipeline(
        &resume_bytes,
        mime,
        &jd_text,
        &JobMetadata::default(),
        Some(config.weights),
        &backends,
    ) {
        Ok(result) => {
            let output = serde_json::json!({
                "score": result.score,
                "feedback": result.feedback,
            });
            match serde_json::to_string_pretty(&output) {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("failed to serialize result: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            e.log("pipeline");
            eprintln!("evaluation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
