use std::fmt;

/// 入力検査で検出されるエラー。探索を始める前に必ず返す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// 面子の牌が宣言された（または推定された）形と一致しない
    InvalidMeldPattern(String),
    /// 枚数の矛盾（残り枚数が負、手牌が13/14枚でない、5枚目の牌など）
    InconsistentTileCounts(String),
    /// 組み合わせられないオプション指定
    UnsupportedOption(String),
    /// 和了形でない、役がない、すでに和了形など
    InvalidHand(String),
}

impl AnalysisError {
    pub fn message(&self) -> &str {
        match self {
            AnalysisError::InvalidMeldPattern(m)
            | AnalysisError::InconsistentTileCounts(m)
            | AnalysisError::UnsupportedOption(m)
            | AnalysisError::InvalidHand(m) => m,
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            AnalysisError::InvalidMeldPattern(_) => "invalid meld pattern",
            AnalysisError::InconsistentTileCounts(_) => "inconsistent tile counts",
            AnalysisError::UnsupportedOption(_) => "unsupported option",
            AnalysisError::InvalidHand(_) => "invalid hand",
        };
        write!(f, "{}: {}", kind, self.message())
    }
}

impl std::error::Error for AnalysisError {}

pub type Result<T> = std::result::Result<T, AnalysisError>;
