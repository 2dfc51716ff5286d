//! 作品文件命名
//!
//! 文件名即顺序：`meme-<毫秒时间戳>-<序号>.png`。
//! 同一毫秒内（或时钟回拨时）沿用上一个时间戳并递增序号，保证键严格递增，
//! 重启后仅凭文件名即可恢复新旧顺序。

use std::fmt;

const FILE_PREFIX: &str = "meme-";
const FILE_SUFFIX: &str = ".png";

/// 作品排序键。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactKey {
    pub millis: i64,
    pub seq: u32,
}

impl ArtifactKey {
    /// 在 `previous` 之后分配下一个键。
    pub fn next_after(previous: Option<ArtifactKey>, now_millis: i64) -> Self {
        match previous {
            Some(prev) if now_millis <= prev.millis => Self {
                millis: prev.millis,
                seq: prev.seq + 1,
            },
            _ => Self {
                millis: now_millis,
                seq: 0,
            },
        }
    }

    pub fn file_name(&self) -> String {
        format!("{FILE_PREFIX}{self}{FILE_SUFFIX}")
    }

    /// 从文件名解析键；不是本模块生成的文件返回 `None`。
    pub fn parse_file_name(name: &str) -> Option<Self> {
        let id = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
        Self::parse_id(id)
    }

    pub fn parse_id(id: &str) -> Option<Self> {
        let (millis, seq) = id.split_once('-')?;
        if millis.is_empty() || seq.is_empty() || !millis.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if !seq.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            millis: millis.parse().ok()?,
            seq: seq.parse().ok()?,
        })
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:013}-{:03}", self.millis, self.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_after_bumps_sequence_within_same_tick() {
        let first = ArtifactKey::next_after(None, 1_700_000_000_000);
        let second = ArtifactKey::next_after(Some(first), 1_700_000_000_000);
        let third = ArtifactKey::next_after(Some(second), 1_700_000_000_001);

        assert_eq!(first.seq, 0);
        assert_eq!(second, ArtifactKey { millis: 1_700_000_000_000, seq: 1 });
        assert_eq!(third, ArtifactKey { millis: 1_700_000_000_001, seq: 0 });
        assert!(first < second && second < third);
    }

    #[test]
    fn next_after_survives_clock_going_backwards() {
        let prev = ArtifactKey { millis: 2_000, seq: 4 };
        let next = ArtifactKey::next_after(Some(prev), 1_000);
        assert_eq!(next, ArtifactKey { millis: 2_000, seq: 5 });
    }

    #[test]
    fn file_name_roundtrip_and_foreign_names() {
        let key = ArtifactKey { millis: 1_700_000_000_123, seq: 7 };
        assert_eq!(key.file_name(), "meme-1700000000123-007.png");
        assert_eq!(ArtifactKey::parse_file_name(&key.file_name()), Some(key));

        for foreign in [
            "meme-1700000000123.png",
            "meme-abc-001.png",
            "img_20260101.png",
            "meme-1700000000123-007.png.tmp",
            "meme--1.png",
        ] {
            assert_eq!(ArtifactKey::parse_file_name(foreign), None, "{foreign}");
        }
    }
}
