//! Text tokenizer for hash embeddings / 文本分词器
//!
//! Supports / 支持：
//! - Word segmentation on non-alphanumeric boundaries (accents kept) / 按非字母数字切分
//! - Lowercasing / 转小写
//! - Character N-grams for typo tolerance / 字符 N-gram

/// Tokenize text / 对文本进行分词
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Generate N-grams (for fuzzy matching) / 生成 N-gram
///
/// Example: "vote" with n = 3 -> ["vot", "ote"] / 例如
pub fn generate_ngrams(word: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    if n == 0 || chars.len() < n {
        return Vec::new();
    }
    chars.windows(n).map(|w| w.iter().collect()).collect()
}
