//! Vector index / 向量索引

use std::collections::HashMap;

use super::SearchError;

/// One nearest-neighbor result / 单条近邻结果
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub id: String,
    pub text: String,
    pub distance: f32,
}

/// Stores vectors and answers k-nearest queries / 向量存储与近邻查询
pub trait VectorIndex: Send + Sync {
    /// Insert, replacing any entry with the same id / 插入或替换
    fn upsert(&mut self, id: String, text: String, vector: Vec<f32>) -> Result<(), SearchError>;

    /// The `k` nearest entries, closest first / 最近的 k 条
    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<IndexHit>, SearchError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Entry {
    text: String,
    vector: Vec<f32>,
}

/// Brute-force in-memory index using squared L2 distance / 内存暴力检索（平方 L2 距离）
pub struct MemoryIndex {
    dimension: usize,
    entries: HashMap<String, Entry>,
}

impl MemoryIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: HashMap::new(),
        }
    }

    fn check_dimension(&self, len: usize) -> Result<(), SearchError> {
        if len != self.dimension {
            return Err(SearchError::DimensionMismatch {
                expected: self.dimension,
                actual: len,
            });
        }
        Ok(())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl VectorIndex for MemoryIndex {
    fn upsert(&mut self, id: String, text: String, vector: Vec<f32>) -> Result<(), SearchError> {
        self.check_dimension(vector.len())?;
        self.entries.insert(id, Entry { text, vector });
        Ok(())
    }

    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<IndexHit>, SearchError> {
        self.check_dimension(vector.len())?;

        let mut hits: Vec<IndexHit> = self
            .entries
            .iter()
            .map(|(id, entry)| IndexHit {
                id: id.clone(),
                text: entry.text.clone(),
                distance: squared_l2(vector, &entry.vector),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(k);
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
