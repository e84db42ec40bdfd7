use async_trait::async_trait;

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedSong {
    pub track_id: String,
    pub description: String,
}

/// Seam for the song service. The production backend (a remote AI + music
/// catalog) lives behind this trait; the shipped implementation derives the
/// song locally so the whole loop runs without network credentials.
#[async_trait]
pub trait SongGenerator: Send + Sync {
    async fn generate(&self, png: &[u8]) -> Result<GeneratedSong, String>;
}

/// Deterministic generator: measures the bitmap (how much of it is painted,
/// how bright it is, how colorful it is) and maps the mood onto a fixed
/// track table. The same drawing always yields the same song.
pub struct MoodGenerator;

struct MoodProfile {
    luma: f64,
    colorfulness: f64,
    coverage: f64,
}

/// Ink/brightness/color thresholds that split the mood space.
const COVERAGE_SPLIT: f64 = 0.25;
const LUMA_SPLIT: f64 = 0.6;
const COLORFULNESS_SPLIT: f64 = 0.12;

// One track per corner of the (busy, bright, colorful) cube.
const MOOD_TRACKS: &[(&str, &str)] = &[
    (
        "3dZkAzUlvzuKpBbGIcvdzS",
        "A sparse, shadowy sketch. It hums like a slow ambient piece in a dark room.",
    ),
    (
        "5sNESr6pQfIhqqmJhtmLjp",
        "A few deep strokes of color in the dark. It sounds like late-night synthwave.",
    ),
    (
        "1c8gk2PeTE04A1pIDH9YMk",
        "A light canvas with just a gesture on it. It plays like a quiet piano morning.",
    ),
    (
        "6y0igZArWVi6Iz0rj35c1Y",
        "A bright splash of color and lots of open space. It feels like breezy indie pop.",
    ),
    (
        "2TRu7dMps7cVKOyazkj9Fb",
        "Dense, heavy linework in near-monochrome. It rumbles like a brooding post-rock build.",
    ),
    (
        "0q6LuUqGLUiCPP1cbdwFs3",
        "A dark canvas crowded with color. It pulses like a packed midnight dance floor.",
    ),
    (
        "4uLU6hMCjMI75M1A2tKUQC",
        "A busy drawing in bright grayscale. It claps along like an upbeat acoustic jam.",
    ),
    (
        "7qiZfU4dY1lWllzX7mPBI3",
        "A loud, bright, color-soaked painting. It bursts like a festival anthem at noon.",
    ),
];

impl MoodGenerator {
    fn profile(png: &[u8]) -> Result<MoodProfile, String> {
        let image = image::load_from_memory(png)
            .map_err(|error| format!("Could not read the drawing: {error}"))?;
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err("The drawing has no pixels".to_string());
        }

        let mut luma_sum = 0.0f64;
        let mut colorfulness_sum = 0.0f64;
        let mut ink = 0u64;
        for pixel in rgb.pixels() {
            let [r, g, b] = pixel.0;
            let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
            let luma = 0.2126 * r + 0.7152 * g + 0.0722 * b;
            luma_sum += luma;
            colorfulness_sum += r.max(g).max(b) - r.min(g).min(b);
            // Anything darker than near-white counts as paint.
            if luma < 240.0 {
                ink += 1;
            }
        }
        let count = f64::from(width) * f64::from(height);
        Ok(MoodProfile {
            luma: luma_sum / count / 255.0,
            colorfulness: colorfulness_sum / count / 255.0,
            coverage: ink as f64 / count,
        })
    }

    fn pick(profile: &MoodProfile) -> &'static (&'static str, &'static str) {
        let mut index = 0;
        if profile.coverage > COVERAGE_SPLIT {
            index += 4;
        }
        if profile.luma > LUMA_SPLIT {
            index += 2;
        }
        if profile.colorfulness > COLORFULNESS_SPLIT {
            index += 1;
        }
        &MOOD_TRACKS[index]
    }
}

#[async_trait]
impl SongGenerator for MoodGenerator {
    async fn generate(&self, png: &[u8]) -> Result<GeneratedSong, String> {
        let profile = Self::profile(png)?;
        let (track_id, description) = Self::pick(&profile);
        Ok(GeneratedSong {
            track_id: (*track_id).to_string(),
            description: (*description).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_of_color(rgb: [u8; 3], width: u32, height: u32) -> Vec<u8> {
        let buffer = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
        let mut bytes = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut bytes);
        buffer
            .write_to(&mut cursor, image::ImageOutputFormat::Png)
            .expect("encode");
        bytes
    }

    #[tokio::test]
    async fn same_drawing_always_yields_the_same_song() {
        let png = png_of_color([40, 90, 200], 64, 64);
        let first = MoodGenerator.generate(&png).await.expect("generate");
        let second = MoodGenerator.generate(&png).await.expect("generate");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn blank_and_painted_canvases_sound_different() {
        let blank = png_of_color([255, 255, 255], 64, 64);
        let painted = png_of_color([20, 20, 20], 64, 64);
        let quiet = MoodGenerator.generate(&blank).await.expect("generate");
        let loud = MoodGenerator.generate(&painted).await.expect("generate");
        assert_ne!(quiet.track_id, loud.track_id);
    }

    #[tokio::test]
    async fn colorful_drawings_pick_a_colorful_mood() {
        let gray = png_of_color([100, 100, 100], 64, 64);
        let red = png_of_color([220, 30, 30], 64, 64);
        let muted = MoodGenerator.generate(&gray).await.expect("generate");
        let vivid = MoodGenerator.generate(&red).await.expect("generate");
        assert_ne!(muted.track_id, vivid.track_id);
    }

    #[tokio::test]
    async fn garbage_bytes_are_rejected() {
        let error = MoodGenerator
            .generate(b"definitely not a png")
            .await
            .expect_err("reject");
        assert!(error.contains("Could not read the drawing"));
    }

    #[test]
    fn every_mood_corner_has_a_track() {
        assert_eq!(MOOD_TRACKS.len(), 8);
        for (track_id, description) in MOOD_TRACKS {
            assert!(!track_id.is_empty());
            assert!(!description.is_empty());
        }
    }
}
