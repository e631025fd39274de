//! Capability interfaces for the three optional collaborators named in §6:
//! NLP, embeddings, and LLM generation. Each is a small trait with a single
//! job; a null implementation short-circuits the corresponding tier when no
//! real backend is wired up, exactly as the design notes prescribe.

/// A single token as produced by an NLP backend's tokenizer.
#[derive(Debug, Clone)]
pub struct Token {
    pub token: String,
    pub pos: Option<String>,
    pub ent_type: Option<String>,
}

pub trait NlpBackend: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
    fn noun_chunks(&self, text: &str) -> Vec<String>;
}

pub struct NullNlpBackend;

impl NlpBackend for NullNlpBackend {
    fn tokenize(&self, _text: &str) -> Vec<Token> {
        Vec::new()
    }

    fn noun_chunks(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}

pub trait EmbeddingBackend: Send + Sync {
    /// Dimension of the vectors this backend produces (e.g. 384).
    fn dimension(&self) -> usize;
    fn embed(&self, texts: &[String]) -> Vec<Vec<f32>>;
}

pub struct NullEmbeddingBackend;

impl EmbeddingBackend for NullEmbeddingBackend {
    fn dimension(&self) -> usize {
        0
    }

    fn embed(&self, _texts: &[String]) -> Vec<Vec<f32>> {
        Vec::new()
    }
}

pub trait LlmBackend: Send + Sync {
    fn generate(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Option<String>;
}

pub struct NullLlmBackend;

impl LlmBackend for NullLlmBackend {
    fn generate(&self, _prompt: &str, _max_tokens: u32, _temperature: f32) -> Option<String> {
        None
    }
}

/// Bundle of whichever backends the caller wires up; any field left `None`
/// causes the corresponding pipeline tier to be skipped.
#[derive(Default)]
pub struct Backends<'a> {
    pub nlp: Option<&'a dyn NlpBackend>,
    pub embedding: Option<&'a dyn EmbeddingBackend>,
    pub llm: Option<&'a dyn LlmBackend>,
}

#[cfg(feature = "ollama")]
pub mod ollama {
    //! A concrete `LLMBackend` wired to a local Ollama server, grounded in
    //! the teacher's `OllamaClient`. Illustrative wiring only: the pipeline
    //! is complete and fully exercised with the null backends alone.

    use super::LlmBackend;
    use std::time::Duration;

    pub struct OllamaLlmBackend {
        base_url: String,
        model: String,
        client: reqwest::blocking::Client,
    }

    impl OllamaLlmBackend {
        pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(120))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .expect("failed to build Ollama HTTP client");
            Self {
                base_url: base_url.into(),
                model: model.into(),
                client,
            }
        }
    }

    #[derive(serde::Serialize)]
    struct GenerateRequest<'a> {
        model: &'a str,
        prompt: &'a str,
        stream: bool,
        options: GenerateOptions,
    }

    #[derive(serde::Serialize)]
    struct GenerateOptions {
        temperature: f32,
        max_tokens: u32,
    }

    #[derive(serde::Deserialize)]
    struct GenerateResponse {
        response: String,
    }

    impl LlmBackend for OllamaLlmBackend {
        fn generate(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Option<String> {
            let request = GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
                options: GenerateOptions {
                    temperature,
                    max_tokens,
                },
            };

            let response = self
                .client
                .post(format!("{}/api/generate", self.base_url))
                .json(&request)
                .send()
                .map_err(|e| log::warn!("ollama request failed: {}", e))
                .ok()?;

            if !response.status().is_success() {
                log::warn!("ollama returned status {}", response.status());
                return None;
            }

            response
                .json::<GenerateResponse>()
                .map_err(|e| log::warn!("ollama response decode failed: {}", e))
                .ok()
                .map(|r| r.response)
        }
    }
}
