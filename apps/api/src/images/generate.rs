//! Image generation through Pollinations. No model call happens server-side:
//! each image is a URL the browser loads directly.

use serde::Serialize;

pub const DEFAULT_STYLE: &str = "Default";
pub const DEFAULT_ASPECT_RATIO: &str = "Square (1:1)";
pub const DEFAULT_IMAGE_COUNT: u32 = 4;
/// Used when the requested count is unusable.
pub const FALLBACK_IMAGE_COUNT: u32 = 1;
pub const MAX_IMAGE_COUNT: u32 = 4;

const POLLINATIONS_BASE: &str = "https://image.pollinations.ai/prompt";
const SEED_RANGE: u32 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: u32,
    pub url: String,
    pub prompt: String,
    pub style: String,
    pub aspect_ratio: String,
}

/// Pixel size for an aspect-ratio label such as "Landscape (16:9)".
pub fn dimensions(aspect_ratio: &str) -> (u32, u32) {
    if aspect_ratio.contains("16:9") {
        (1280, 720)
    } else if aspect_ratio.contains("9:16") {
        (720, 1280)
    } else if aspect_ratio.contains("4:3") {
        (1024, 768)
    } else {
        (1024, 1024)
    }
}

pub fn styled_prompt(prompt: &str, style: &str) -> String {
    if style == DEFAULT_STYLE {
        prompt.to_string()
    } else {
        format!("{prompt}, {style} style")
    }
}

/// Builds `count` image descriptors. `seed` is called once per image and
/// reduced into `[0, 1_000_000)`.
pub fn plan_images(
    prompt: &str,
    style: &str,
    aspect_ratio: &str,
    count: u32,
    mut seed: impl FnMut() -> u32,
) -> Vec<GeneratedImage> {
    let (width, height) = dimensions(aspect_ratio);
    let encoded = encode_uri_component(&styled_prompt(prompt, style));

    (1..=count)
        .map(|id| {
            let seed = seed() % SEED_RANGE;
            GeneratedImage {
                id,
                url: format!(
                    "{POLLINATIONS_BASE}/{encoded}?width={width}&height={height}&seed={seed}&model=flux&nologo=true"
                ),
                prompt: prompt.to_string(),
                style: style.to_string(),
                aspect_ratio: aspect_ratio.to_string(),
            }
        })
        .collect()
}

/// Percent-encodes like JavaScript's `encodeURIComponent`, which leaves
/// `! ' ( ) *` alone where `urlencoding` escapes them.
fn encode_uri_component(text: &str) -> String {
    // Every '%' in the output opens an escape triple, so these can't misfire.
    [("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%2A", "*")]
        .iter()
        .fold(urlencoding::encode(text).into_owned(), |acc, (escaped, raw)| {
            acc.replace(*escaped, raw)
        })
}

pub fn random_seed() -> u32 {
    use rand::Rng;
    rand::thread_rng().gen_range(0..SEED_RANGE)
}
