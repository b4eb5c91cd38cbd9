//! Tones and prompt text for the text generator
//!

use std::fmt;
use std::sync::Arc;

/// Humour styles a meme can be asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Plain funny.
    Funny,
    /// Sarcastic.
    Sarcastic,
    /// Relatable.
    Relatable,
    /// Dark humour.
    DarkHumor,
    /// Wholesome.
    Wholesome,
    /// Absurdist.
    Absurdist,
    /// Motivational.
    Motivational,
}

impl Tone {
    /// Tones picked from when the request doesn't name one.
    pub const RANDOM_POOL: [Tone; 5] = [
        Tone::Sarcastic,
        Tone::Relatable,
        Tone::DarkHumor,
        Tone::Wholesome,
        Tone::Absurdist,
    ];

    /// Parses a form value. `random`, blanks and unknown names are `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "funny" => Some(Tone::Funny),
            "sarcastic" => Some(Tone::Sarcastic),
            "relatable" => Some(Tone::Relatable),
            "dark" | "dark humor" => Some(Tone::DarkHumor),
            "wholesome" => Some(Tone::Wholesome),
            "absurdist" => Some(Tone::Absurdist),
            "motivational" => Some(Tone::Motivational),
            _ => None,
        }
    }

    /// The sentence appended to the meme prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            Tone::Funny => "Make it funny.",
            Tone::Sarcastic => "Make it sarcastic.",
            Tone::Relatable => "Make it relatable.",
            Tone::DarkHumor => "Make it dark humor.",
            Tone::Wholesome => "Make it wholesome.",
            Tone::Absurdist => "Make it absurdist.",
            Tone::Motivational => "Make it motivational.",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Funny => "funny",
            Tone::Sarcastic => "sarcastic",
            Tone::Relatable => "relatable",
            Tone::DarkHumor => "dark humor",
            Tone::Wholesome => "wholesome",
            Tone::Absurdist => "absurdist",
            Tone::Motivational => "motivational",
        };
        f.write_str(name)
    }
}

/// Picks one tone out of a non-empty pool.
pub type TonePicker = Arc<dyn Fn(&[Tone]) -> Tone + Send + Sync>;

/// The production picker, uniformly random.
pub fn random_tone_picker() -> TonePicker {
    Arc::new(|pool: &[Tone]| {
        if pool.is_empty() {
            return Tone::Funny;
        }
        pool[rand::random_range(0..pool.len())]
    })
}

/// A picker that always answers `tone`, for tests and reproducible runs.
pub fn fixed_tone_picker(tone: Tone) -> TonePicker {
    Arc::new(move |_: &[Tone]| tone)
}

/// Resolves the requested tone, asking `picker` when there isn't a usable one.
pub fn resolve_tone(raw: &str, picker: &TonePicker) -> Tone {
    Tone::parse(raw).unwrap_or_else(|| picker(&Tone::RANDOM_POOL))
}

/// Prompt for a single meme caption.
pub fn meme_prompt(tone: Tone) -> String {
    format!(
        "You are a professional meme creator. Generate ONE single funniest meme caption \
         for this image. {} Keep it short, witty, and viral-worthy. \
         Output only the meme text.",
        tone.instruction()
    )
}

/// Prompt for two social media captions.
pub fn caption_prompt(tone: &str, context: &str, hashtags: bool) -> String {
    let mut prompt = format!(
        "Generate exactly 2 short, catchy, modern social media captions \
         for this image in a {tone} tone about {context}. \
         They should sound like Instagram/Twitter captions people post today. \
         Output ONLY the 2 captions, each on a new line, with no numbers, no bullet points, \
         no introductions, and no explanations."
    );
    if hashtags {
        prompt.push_str(" Add 2-4 relevant trending hashtags to each caption.");
    }
    prompt
}

/// Prompt for a short story.
pub fn story_prompt(tone: &str) -> String {
    format!(
        "Write one {tone} short story inspired by this image. \
         Do not add explanations, only output the story."
    )
}

/// Prompt for a free-form description.
pub fn description_prompt() -> String {
    "Describe this image in a creative way, output only the description.".to_string()
}

/// Placeholder used when the model returns no captions.
pub const NO_CAPTION: &str = "No caption generated";

/// Splits model output into exactly two captions.
pub fn split_captions(text: &str) -> (String, String) {
    let mut captions = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string);
    match (captions.next(), captions.next()) {
        (Some(first), Some(second)) => (first, second),
        (Some(first), None) => {
            let second = format!("{first} ✨");
            (first, second)
        }
        _ => (NO_CAPTION.to_string(), NO_CAPTION.to_string()),
    }
}

/// "A Dark Story" style title for a story in `tone`.
pub fn story_title(tone: &str) -> String {
    let mut chars = tone.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    };
    format!("A {capitalized} Story")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tones() {
        assert_eq!(Tone::parse("funny"), Some(Tone::Funny));
        assert_eq!(Tone::parse(" Dark "), Some(Tone::DarkHumor));
        assert_eq!(Tone::parse("dark humor"), Some(Tone::DarkHumor));
        assert_eq!(Tone::parse("MOTIVATIONAL"), Some(Tone::Motivational));
        assert_eq!(Tone::parse("random"), None);
        assert_eq!(Tone::parse(""), None);
        assert_eq!(Tone::parse("spicy"), None);
    }

    #[test]
    fn unknown_tone_uses_picker() {
        let picker = fixed_tone_picker(Tone::Wholesome);
        assert_eq!(resolve_tone("random", &picker), Tone::Wholesome);
        assert_eq!(resolve_tone("", &picker), Tone::Wholesome);
        assert_eq!(resolve_tone("spicy", &picker), Tone::Wholesome);
        assert_eq!(resolve_tone("funny", &picker), Tone::Funny);
    }

    #[test]
    fn picker_only_sees_the_random_pool() {
        let picker: TonePicker = Arc::new(|pool: &[Tone]| {
            assert_eq!(pool, &Tone::RANDOM_POOL);
            pool[pool.len() - 1]
        });
        assert_eq!(resolve_tone("", &picker), Tone::Absurdist);
    }

    #[test]
    fn random_picker_stays_in_pool() {
        let picker = random_tone_picker();
        for _ in 0..50 {
            assert!(Tone::RANDOM_POOL.contains(&resolve_tone("random", &picker)));
        }
    }

    #[test]
    fn meme_prompt_carries_tone() {
        assert!(meme_prompt(Tone::Sarcastic).contains("Make it sarcastic."));
        assert!(meme_prompt(Tone::DarkHumor).contains("Make it dark humor."));
    }

    #[test]
    fn caption_prompt_hashtags() {
        assert!(!caption_prompt("witty", "coffee", false).contains("hashtags"));
        let prompt = caption_prompt("witty", "coffee", true);
        assert!(prompt.contains("in a witty tone about coffee"));
        assert!(prompt.ends_with("Add 2-4 relevant trending hashtags to each caption."));
    }

    #[test]
    fn captions_are_always_two() {
        assert_eq!(
            split_captions("first\r\n\nsecond\nthird"),
            ("first".to_string(), "second".to_string())
        );
        assert_eq!(
            split_captions("  only one  "),
            ("only one".to_string(), "only one ✨".to_string())
        );
        assert_eq!(
            split_captions(" \n "),
            (NO_CAPTION.to_string(), NO_CAPTION.to_string())
        );
    }

    #[test]
    fn titles() {
        assert_eq!(story_title("dark"), "A Dark Story");
        assert_eq!(story_title("wHOLESOME"), "A Wholesome Story");
        assert_eq!(story_title(""), "A  Story");
    }
}
