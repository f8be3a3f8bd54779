//! 知识库存储
//!
//! 启动时一次性加载全部数据源并构建倒排索引，之后只读，可被任意多个请求并发读取。

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::DataLoadError;
use super::loader::read_json_array;
use crate::index::{IndexDocument, TokenIndex, Tokenizer};
use crate::models::{KnowledgeEntry, RawKnowledgeEntry};

/// 已加载数据源的摘要
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSummary {
    pub path: PathBuf,
    pub entries: usize,
}

/// 内存知识库
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    entries: Vec<KnowledgeEntry>,
    index: TokenIndex,
    sources: Vec<SourceSummary>,
}

impl KnowledgeStore {
    /// 按顺序加载数据源
    ///
    /// 出错的数据源记录警告后跳过；没有任何数据源可用时返回 `NoUsableSource`。
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, DataLoadError> {
        let mut entries = Vec::new();
        let mut sources = Vec::new();

        for path in paths {
            let path = path.as_ref();
            match load_source(path) {
                Ok(loaded) => {
                    info!("Loaded {} knowledge entries from {}", loaded.len(), path.display());
                    sources.push(SourceSummary {
                        path: path.to_path_buf(),
                        entries: loaded.len(),
                    });
                    entries.extend(loaded);
                }
                Err(e) => {
                    warn!("Skipping knowledge source: {}", e);
                }
            }
        }

        if sources.is_empty() {
            return Err(DataLoadError::NoUsableSource {
                attempted: paths.len(),
            });
        }

        let mut store = Self::from_entries(entries);
        store.sources = sources;
        Ok(store)
    }

    /// 直接由条目构建（测试与基准使用）
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        let index = build_index(&entries);
        Self {
            entries,
            index,
            sources: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn entry(&self, position: usize) -> Option<&KnowledgeEntry> {
        self.entries.get(position)
    }

    pub fn index(&self) -> &TokenIndex {
        &self.index
    }

    pub fn sources(&self) -> &[SourceSummary] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 加载单个数据源，缺字段或重复 id 时整个数据源作废
pub fn load_source(path: &Path) -> Result<Vec<KnowledgeEntry>, DataLoadError> {
    let raw: Vec<RawKnowledgeEntry> = read_json_array(path)?;
    let mut seen = HashSet::with_capacity(raw.len());
    let mut entries = Vec::with_capacity(raw.len());

    for (index, record) in raw.into_iter().enumerate() {
        let entry = record
            .into_entry()
            .map_err(|field| DataLoadError::MissingField {
                path: path.to_path_buf(),
                index,
                field,
            })?;
        if !seen.insert(entry.id.clone()) {
            return Err(DataLoadError::DuplicateId {
                path: path.to_path_buf(),
                id: entry.id,
            });
        }
        entries.push(entry);
    }

    Ok(entries)
}

/// 由条目构建倒排索引，纯函数
pub fn build_index(entries: &[KnowledgeEntry]) -> TokenIndex {
    let texts: Vec<String> = entries.iter().map(KnowledgeEntry::indexable_text).collect();
    TokenIndex::build(
        entries.iter().zip(&texts).map(|(entry, text)| IndexDocument {
            title: entry.title.as_str(),
            text: text.as_str(),
        }),
        &Tokenizer::retrieval(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_source(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    const FAQ: &str = r#"[
        {"id": "faq-1", "title": "Fever care", "content": "Drink fluids and rest.", "source": "Medical FAQ", "category": "general"},
        {"id": "faq-2", "title": "Dengue prevention", "content": "Remove stagnant water.", "source": "Medical FAQ", "tags": ["Mosquito"]}
    ]"#;

    #[test]
    fn test_load_builds_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "faq.json", FAQ);

        let store = KnowledgeStore::load(&[path]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.index().len(), 2);
        assert_eq!(store.index().doc_freq("mosquito"), 1);
        assert_eq!(store.sources()[0].entries, 2);
    }

    #[test]
    fn test_bad_source_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_source(&dir, "faq.json", FAQ);
        let broken = write_source(&dir, "broken.json", "[{\"id\": ");
        let missing = dir.path().join("missing.json");

        let store = KnowledgeStore::load(&[broken, missing, good]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.sources().len(), 1);
    }

    #[test]
    fn test_duplicate_ids_reject_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(
            &dir,
            "dup.json",
            r#"[
                {"id": "x", "title": "A", "content": "a a", "source": "S"},
                {"id": "x", "title": "B", "content": "b b", "source": "S"}
            ]"#,
        );
        let err = load_source(&path).unwrap_err();
        assert!(matches!(err, DataLoadError::DuplicateId { ref id, .. } if id == "x"));
    }

    #[test]
    fn test_missing_field_rejects_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "nosrc.json", r#"[{"id": "x", "title": "A", "content": "a"}]"#);
        let err = load_source(&path).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingField { field: "source", index: 0, .. }));
    }

    #[test]
    fn test_no_usable_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = KnowledgeStore::load(&[dir.path().join("a.json"), dir.path().join("b.json")])
            .unwrap_err();
        assert!(matches!(err, DataLoadError::NoUsableSource { attempted: 2 }));
    }

    #[test]
    fn test_build_index_is_deterministic() {
        let entries = vec![
            KnowledgeEntry::new("1", "Malaria", "Malaria spreads through mosquito bites.", "FAQ"),
            KnowledgeEntry::new("2", "Hydration", "Drink water during fever.", "FAQ"),
        ];
        assert_eq!(build_index(&entries), build_index(&entries));
    }
}
