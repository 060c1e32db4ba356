use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::messages;

/// A processed document as returned by the backend.
///
/// Text columns may be `null` on the server; they decode as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upload {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub texto_extraido: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categoria: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resposta_automatica: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resultado_itzam: String,
    /// Only present on list and detail responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of a successful `POST /upload`. Same shape as a list entry minus
/// `created_at`.
pub type UploadResult = Upload;

impl Upload {
    pub fn category(&self) -> Category {
        Category::from_label(&self.categoria)
    }

    pub fn has_reply(&self) -> bool {
        !self.resposta_automatica.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope of `GET /uploads`. A missing key means no uploads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadList {
    #[serde(default)]
    pub uploads: Vec<Upload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Produtivo,
    Improdutivo,
    Unclassified,
}

impl Category {
    /// Exact, case-sensitive match on the server label.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Produtivo" => Category::Produtivo,
            "Improdutivo" => Category::Improdutivo,
            _ => Category::Unclassified,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Produtivo => "Produtivo",
            Category::Improdutivo => "Improdutivo",
            Category::Unclassified => messages::NOT_CLASSIFIED,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Category::Produtivo => Tone::Success,
            Category::Improdutivo => Tone::Warning,
            Category::Unclassified => Tone::Muted,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Presentation hint, mapped to colors by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
    Muted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Produtivo,
    Improdutivo,
}

impl CategoryFilter {
    pub const ALL: &[CategoryFilter] = &[
        CategoryFilter::All,
        CategoryFilter::Produtivo,
        CategoryFilter::Improdutivo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Produtivo => "produtivo",
            CategoryFilter::Improdutivo => "improdutivo",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "TODOS",
            CategoryFilter::Produtivo => "PRODUTIVOS",
            CategoryFilter::Improdutivo => "IMPRODUTIVOS",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(CategoryFilter::All),
            "produtivo" => Some(CategoryFilter::Produtivo),
            "improdutivo" => Some(CategoryFilter::Improdutivo),
            _ => None,
        }
    }

    pub fn matches(&self, upload: &Upload) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Produtivo => upload.categoria == "Produtivo",
            CategoryFilter::Improdutivo => upload.categoria == "Improdutivo",
        }
    }

    pub fn apply<'a>(&self, uploads: &'a [Upload]) -> Vec<&'a Upload> {
        uploads.iter().filter(|u| self.matches(u)).collect()
    }

    /// Message shown when this filter matches nothing in a non-empty list.
    pub fn empty_message(&self) -> &'static str {
        match self {
            CategoryFilter::All => messages::NO_DOCUMENTS,
            CategoryFilter::Produtivo => messages::NO_PRODUCTIVE,
            CategoryFilter::Improdutivo => messages::NO_UNPRODUCTIVE,
        }
    }
}

/// Per-filter counts over the in-memory list.
///
/// `produtivo + improdutivo + unclassified == all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub all: usize,
    pub produtivo: usize,
    pub improdutivo: usize,
    pub unclassified: usize,
}

impl FilterCounts {
    pub fn from_uploads(uploads: &[Upload]) -> Self {
        uploads
            .iter()
            .fold(FilterCounts::default(), |mut acc, upload| {
                acc.all += 1;
                match upload.category() {
                    Category::Produtivo => acc.produtivo += 1,
                    Category::Improdutivo => acc.improdutivo += 1,
                    Category::Unclassified => acc.unclassified += 1,
                }
                acc
            })
    }

    pub fn for_filter(&self, filter: CategoryFilter) -> usize {
        match filter {
            CategoryFilter::All => self.all,
            CategoryFilter::Produtivo => self.produtivo,
            CategoryFilter::Improdutivo => self.improdutivo,
        }
    }
}

/// Outcome of a batch delete, one entry per requested id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    /// `(id, error message)`
    pub failed: Vec<(String, String)>,
}

impl DeleteReport {
    pub fn requested(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_complete() {
            format!("{} documento(s) apagado(s)", self.deleted.len())
        } else {
            format!(
                "{} de {} exclusões falharam",
                self.failed.len(),
                self.requested()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(id: &str, categoria: &str) -> Upload {
        Upload {
            id: id.into(),
            filename: format!("{id}.txt"),
            texto_extraido: String::new(),
            categoria: categoria.into(),
            resposta_automatica: String::new(),
            resultado_itzam: String::new(),
            created_at: None,
        }
    }

    fn sample() -> Vec<Upload> {
        vec![
            upload("a", "Produtivo"),
            upload("b", "Improdutivo"),
            upload("c", ""),
            upload("d", "Produtivo"),
            upload("e", "produtivo"),
            upload("f", "Não classificado"),
        ]
    }

    #[test]
    fn decodes_nulls_and_missing_fields() {
        let json = r#"{
            "id": "1",
            "filename": "mail.pdf",
            "texto_extraido": null,
            "categoria": null,
            "resposta_automatica": "Obrigado",
            "created_at": "2025-03-01 12:00:00"
        }"#;
        let u: Upload = serde_json::from_str(json).unwrap();
        assert_eq!(u.texto_extraido, "");
        assert_eq!(u.categoria, "");
        assert_eq!(u.resultado_itzam, "");
        assert_eq!(u.created_at.as_deref(), Some("2025-03-01 12:00:00"));
        assert_eq!(u.category(), Category::Unclassified);
    }

    #[test]
    fn upload_list_without_key_is_empty() {
        let list: UploadList = serde_json::from_str("{}").unwrap();
        assert!(list.uploads.is_empty());
    }

    #[test]
    fn category_is_exact_match() {
        assert_eq!(Category::from_label("Produtivo"), Category::Produtivo);
        assert_eq!(Category::from_label("Improdutivo"), Category::Improdutivo);
        assert_eq!(Category::from_label("produtivo"), Category::Unclassified);
        assert_eq!(Category::from_label(""), Category::Unclassified);
        assert_eq!(Category::Unclassified.tone(), Tone::Muted);
        assert_eq!(Category::Unclassified.to_string(), "Não classificado");
    }

    #[test]
    fn filter_all_returns_everything() {
        let uploads = sample();
        assert_eq!(CategoryFilter::All.apply(&uploads).len(), uploads.len());
    }

    #[test]
    fn filter_produtivo_is_literal() {
        let uploads = sample();
        let ids: Vec<&str> = CategoryFilter::Produtivo
            .apply(&uploads)
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn filter_improdutivo_is_literal() {
        let uploads = sample();
        let ids: Vec<&str> = CategoryFilter::Improdutivo
            .apply(&uploads)
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn counts_are_consistent() {
        let uploads = sample();
        let counts = FilterCounts::from_uploads(&uploads);
        assert_eq!(counts.all, 6);
        assert_eq!(counts.produtivo, 2);
        assert_eq!(counts.improdutivo, 1);
        assert_eq!(counts.unclassified, 3);
        assert_eq!(
            counts.produtivo + counts.improdutivo + counts.unclassified,
            counts.all
        );
        for &filter in CategoryFilter::ALL {
            assert_eq!(counts.for_filter(filter), filter.apply(&uploads).len());
        }
    }

    #[test]
    fn filter_round_trips_through_str() {
        for &filter in CategoryFilter::ALL {
            assert_eq!(CategoryFilter::from_str(filter.as_str()), Some(filter));
        }
        assert_eq!(CategoryFilter::from_str("bogus"), None);
    }

    #[test]
    fn delete_report_summary() {
        let ok = DeleteReport {
            deleted: vec!["a".into(), "b".into()],
            failed: vec![],
        };
        assert!(ok.is_complete());
        assert_eq!(ok.summary(), "2 documento(s) apagado(s)");

        let partial = DeleteReport {
            deleted: vec!["a".into()],
            failed: vec![("b".into(), "boom".into())],
        };
        assert!(!partial.is_complete());
        assert_eq!(partial.requested(), 2);
        assert_eq!(partial.summary(), "1 de 2 exclusões falharam");
    }
}
