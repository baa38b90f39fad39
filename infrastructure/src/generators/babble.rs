//! Offline text generator
//!
//! [`BabbleGenerator`] stitches short sentences around the most salient word
//! of the prompt. It needs no model server, which makes it the default for
//! demos and for running the conversation on machines without one.

use async_trait::async_trait;
use colloquy_application::{GenerationError, TextGenerator};
use colloquy_domain::pick_keyword;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

const FALLBACK_SUBJECT: &str = "this";

const OPENERS: &[&str] = &[
    "Honestly, {} is stranger than it looks.",
    "I keep coming back to {}.",
    "Nobody really agrees on {}.",
    "When people mention {}, I get curious.",
    "There is more to {} than most admit.",
];

const MIDDLES: &[&str] = &[
    "Every time I read about {} the picture changes.",
    "Some say {} is inevitable, others call it fantasy.",
    "The history of {} is full of surprises.",
    "Scientists have argued about {} for decades.",
    "Maybe {} matters less than the questions around it.",
    "I suspect {} will look different in ten years.",
];

const CLOSERS: &[&str] = &[
    "What would you do about it?",
    "That is where I land for now.",
    "Still, I could be wrong.",
    "Either way, it is worth a conversation.",
    "Time will tell.",
];

/// Offline generator producing two to four sentences per prompt.
///
/// Output is reproducible for a fixed seed and call order.
#[derive(Debug, Clone)]
pub struct BabbleGenerator {
    rng: Arc<Mutex<StdRng>>,
}

impl BabbleGenerator {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    fn babble<R: Rng + ?Sized>(rng: &mut R, prompt: &str) -> String {
        let subject = pick_keyword(prompt).unwrap_or_else(|| FALLBACK_SUBJECT.to_string());
        let mut sentences = Vec::with_capacity(4);

        if let Some(opener) = OPENERS.choose(rng) {
            sentences.push(opener.replace("{}", &subject));
        }
        let middles = rng.gen_range(1..=2);
        for middle in MIDDLES.choose_multiple(rng, middles) {
            sentences.push(middle.replace("{}", &subject));
        }
        if rng.gen_bool(0.5)
            && let Some(closer) = CLOSERS.choose(rng)
        {
            sentences.push((*closer).to_string());
        }

        sentences.join(" ")
    }
}

impl Default for BabbleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for BabbleGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let rng = Arc::clone(&self.rng);
        let prompt = prompt.to_string();

        tokio::task::spawn_blocking(move || {
            let mut rng = rng
                .lock()
                .map_err(|_| GenerationError::Other("babble rng lock poisoned".to_string()))?;
            Ok(Self::babble(&mut *rng, &prompt))
        })
        .await
        .map_err(|e| GenerationError::Other(format!("babble task failed: {}", e)))?
    }
}
