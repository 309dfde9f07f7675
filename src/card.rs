//! Post-card presentation for artwork records: artist handle, avatar, age
//! label, caption and client-side engagement numbers.

use crate::feed::types::ArtworkRecord;
use rand::Rng;
use std::fmt;

const DETAIL_SEARCH_BASE: &str = "https://www.perplexity.ai/search?s=o&q=";

/// Everything a card displays. Engagement numbers and avatar hue are drawn
/// once, when the card is built.
#[derive(Debug, Clone, PartialEq)]
pub struct PostCard {
    pub id: u64,
    pub username: String,
    pub avatar_initials: String,
    pub avatar_hue: u16,
    pub artist_name: String,
    pub artist_url: Option<String>,
    pub place_of_origin: String,
    pub title: String,
    pub caption: String,
    pub years_ago: Option<String>,
    pub image_url: Option<String>,
    pub detail_url: String,
    pub likes: u32,
    pub comments: u32,
    pub shares: u32,
}

impl PostCard {
    pub fn from_record<R: Rng + ?Sized>(record: &ArtworkRecord, current_year: i32, rng: &mut R) -> Self {
        let (username, avatar_initials) = artist_handle(&record.artist_name);
        let engagement = Engagement::random(rng);
        Self {
            id: record.id,
            username,
            avatar_initials,
            avatar_hue: rng.gen_range(0..360),
            artist_name: record.artist_name.clone(),
            artist_url: record.artist_url.clone(),
            place_of_origin: record.place_of_origin.clone(),
            title: record.title.clone(),
            caption: caption_tail(&record.medium, &record.short_description),
            years_ago: match (record.date_start, record.date_end) {
                (Some(start), Some(end)) => Some(years_ago(start, end, current_year)),
                _ => None,
            },
            image_url: record.image_url.clone(),
            detail_url: record.detail_url.clone(),
            likes: engagement.likes,
            comments: engagement.comments,
            shares: engagement.shares,
        }
    }

    /// Avatar background as RGB (hue at 60% saturation, 30% lightness).
    pub fn avatar_rgb(&self) -> (u8, u8, u8) {
        hsl_to_rgb(self.avatar_hue as f64, 0.60, 0.30)
    }

    /// Text offered when the card is shared.
    pub fn share_text(&self) -> String {
        format!(
            "\"{}\" by {}, found on Grambrandt: {}",
            self.title, self.artist_name, self.detail_url
        )
    }

    pub fn detail_links(&self) -> DetailLinks {
        DetailLinks::new(&self.title, &self.artist_name)
    }
}

impl fmt::Display for PostCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {} ({})", self.avatar_initials, self.artist_name, self.place_of_origin)?;
        if let Some(url) = &self.image_url {
            writeln!(f, "  {}", url)?;
        }
        writeln!(
            f,
            "  \u{2665} {}  \u{1f4ac} {}  \u{27a4} {}",
            self.likes, self.comments, self.shares
        )?;
        writeln!(f, "  {} {}, {}", self.username, self.title, self.caption)?;
        if let Some(age) = &self.years_ago {
            writeln!(f, "  {}", age)?;
        }
        write!(f, "  {}", self.detail_url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engagement {
    pub likes: u32,
    pub comments: u32,
    pub shares: u32,
}

impl Engagement {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            likes: rng.gen_range(100..=999),
            comments: rng.gen_range(10..=99),
            shares: rng.gen_range(10..=99),
        }
    }
}

/// Search links for the "more information" modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLinks {
    pub about_work: String,
    pub about_artist: String,
}

impl DetailLinks {
    pub fn new(title: &str, artist: &str) -> Self {
        let work_q = format!("Tell me about \"{}\" by {}", title, artist);
        let artist_q = format!("Tell me about the artist {}", artist);
        Self {
            about_work: format!("{}{}", DETAIL_SEARCH_BASE, urlencoding::encode(&work_q)),
            about_artist: format!("{}{}", DETAIL_SEARCH_BASE, urlencoding::encode(&artist_q)),
        }
    }
}

/// Social-style handle and avatar initials for an artist name.
/// "Vincent van Gogh" -> ("vvgogh", "VG").
pub fn artist_handle(name: &str) -> (String, String) {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '-' | '(' | ')'))
        .collect();
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    match words.as_slice() {
        [] => ("Unknown".to_string(), "UN".to_string()),
        [only] => {
            let initials: String = only.chars().take(2).collect();
            (only.to_lowercase(), initials.to_uppercase())
        }
        [first, .., last] => {
            let last_lower = last.to_lowercase();
            let prefix: String = words[..words.len() - 1]
                .iter()
                .filter_map(|w| w.chars().next())
                .flat_map(char::to_lowercase)
                .collect();
            let mut avatar = String::new();
            avatar.extend(first.chars().next());
            avatar.extend(last_lower.chars().next());
            (format!("{}{}", prefix, last_lower), avatar.to_uppercase())
        }
    }
}

/// "N years ago" from the midpoint of the creation range, rounded half up.
pub fn years_ago(date_start: i32, date_end: i32, current_year: i32) -> String {
    let midpoint = ((date_start as f64 + date_end as f64) / 2.0 + 0.5).floor() as i32;
    let diff = current_year - midpoint;
    if diff == 1 {
        "1 year ago".to_string()
    } else {
        format!("{} years ago", diff)
    }
}

/// Caption text after the title: medium with its first letter lowercased,
/// then the short description.
pub fn caption_tail(medium: &str, short_description: &str) -> String {
    let mut chars = medium.chars();
    let medium = match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => c.to_lowercase().chain(chars).collect(),
        _ => medium.to_string(),
    };
    format!("{}. {}", medium, short_description).trim_end().to_string()
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h % 360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r1), to_u8(g1), to_u8(b1))
}
