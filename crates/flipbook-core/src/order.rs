use std::cmp::Ordering;

/// Ordering key taken from a frame file name.
///
/// `Number` holds the first run of ASCII digits (`0`-`9`) with leading zeros
/// stripped, so keys of any length compare by value without overflow. Other
/// Unicode decimal digits (full-width `１`, Arabic-Indic `٣`, ...) are not
/// treated as digits. Names without digits get `Missing`, which sorts after
/// every number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameKey {
    Number(String),
    Missing,
}

impl FrameKey {
    pub fn from_name(name: &str) -> Self {
        let Some(start) = name.find(|c: char| c.is_ascii_digit()) else {
            return FrameKey::Missing;
        };
        let run = &name[start..];
        let end = run
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(run.len());
        let digits = run[..end].trim_start_matches('0');
        FrameKey::Number(digits.to_string())
    }
}

impl Ord for FrameKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FrameKey::Number(a), FrameKey::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (FrameKey::Number(_), FrameKey::Missing) => Ordering::Less,
            (FrameKey::Missing, FrameKey::Number(_)) => Ordering::Greater,
            (FrameKey::Missing, FrameKey::Missing) => Ordering::Equal,
        }
    }
}

impl PartialOrd for FrameKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Stable sort of `items` by the frame number embedded in each name.
pub fn sort_by_frame_number<T, F>(items: &mut [T], name_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_cached_key(|it| FrameKey::from_name(name_of(it)));
}

/// Returns `names` ordered by embedded frame number (see [`FrameKey`]).
pub fn order_frames<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut out: Vec<String> = names.iter().map(|s| s.as_ref().to_string()).collect();
    sort_by_frame_number(&mut out, |s| s.as_str());
    out
}
