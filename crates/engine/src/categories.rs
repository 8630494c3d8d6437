//! Category registry types and the default catalog created on first login.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{MoneyCents, TransactionKind, store::StoreError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    /// Budget ceiling. Informational only, never enforced.
    pub spending_limit: Option<MoneyCents>,
}

impl Category {
    pub(crate) fn from_document(id: String, value: serde_json::Value) -> Result<Self, StoreError> {
        let doc: CategoryDoc = serde_json::from_value(value)?;
        Ok(Self {
            id,
            user_id: doc.user_id,
            name: doc.name,
            description: doc.description,
            color: doc.color,
            spending_limit: doc.spending_limit_minor,
        })
    }
}

/// Raw input for a new category.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub color: String,
    pub spending_limit: Option<MoneyCents>,
}

impl NewCategory {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            color: color.into(),
            spending_limit: None,
        }
    }

    #[must_use]
    pub fn spending_limit(mut self, limit: MoneyCents) -> Self {
        self.spending_limit = Some(limit);
        self
    }
}

/// Partial update of a category (rename, recolor, limit change).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    /// `Some(None)` removes the limit; an explicit JSON `null` maps to it.
    #[serde(deserialize_with = "present")]
    pub spending_limit: Option<Option<MoneyCents>>,
}

impl CategoryPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn spending_limit(mut self, limit: MoneyCents) -> Self {
        self.spending_limit = Some(Some(limit));
        self
    }

    #[must_use]
    pub fn clear_spending_limit(mut self) -> Self {
        self.spending_limit = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.color.is_none()
            && self.spending_limit.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoryDoc {
    pub(crate) user_id: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) color: String,
    #[serde(default)]
    pub(crate) spending_limit_minor: Option<MoneyCents>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoryPatchDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) color: Option<String>,
    /// `Some(None)` clears the stored value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) spending_limit_minor: Option<Option<MoneyCents>>,
}

/// Keeps an explicit `null` apart from an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<MoneyCents>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<MoneyCents>::deserialize(deserializer).map(Some)
}

/// One entry of the default catalog.
#[derive(Clone, Copy, Debug)]
pub struct DefaultCategory {
    pub name: &'static str,
    pub color: &'static str,
    pub description: &'static str,
    /// The kind of transaction the category is meant for. Not stored.
    pub kind: TransactionKind,
}

impl DefaultCategory {
    pub(crate) fn to_new_category(self) -> NewCategory {
        NewCategory::new(self.name, self.description, self.color)
    }
}

const fn income(name: &'static str, color: &'static str, description: &'static str) -> DefaultCategory {
    DefaultCategory {
        name,
        color,
        description,
        kind: TransactionKind::Income,
    }
}

const fn expense(
    name: &'static str,
    color: &'static str,
    description: &'static str,
) -> DefaultCategory {
    DefaultCategory {
        name,
        color,
        description,
        kind: TransactionKind::Expense,
    }
}

/// Categories created for a user who owns none: 5 income, 9 expense.
pub const DEFAULT_CATEGORIES: [DefaultCategory; 14] = [
    income("Salário", "#2ecc71", "Salário mensal e adiantamentos"),
    income("Freelance", "#27ae60", "Trabalhos autônomos e serviços avulsos"),
    income("Investimentos", "#16a085", "Rendimentos, dividendos e juros"),
    income("Presentes", "#1abc9c", "Presentes e doações recebidas"),
    income("Outras Receitas", "#3498db", "Receitas que não se encaixam em outra categoria"),
    expense("Alimentação", "#e74c3c", "Supermercado, restaurantes e delivery"),
    expense("Transporte", "#e67e22", "Combustível, transporte público e aplicativos"),
    expense("Moradia", "#d35400", "Aluguel, condomínio e manutenção da casa"),
    expense("Saúde", "#c0392b", "Plano de saúde, consultas e farmácia"),
    expense("Educação", "#9b59b6", "Cursos, livros e mensalidades"),
    expense("Lazer", "#8e44ad", "Cinema, viagens e entretenimento"),
    expense("Compras", "#f39c12", "Roupas, eletrônicos e compras em geral"),
    expense("Contas", "#7f8c8d", "Água, luz, internet e telefone"),
    expense("Outras Despesas", "#95a5a6", "Despesas que não se encaixam em outra categoria"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation;

    #[test]
    fn default_catalog_is_five_income_nine_expense() {
        let income = DEFAULT_CATEGORIES
            .iter()
            .filter(|c| c.kind == TransactionKind::Income)
            .count();
        assert_eq!(income, 5);
        assert_eq!(DEFAULT_CATEGORIES.len() - income, 9);
    }

    #[test]
    fn default_catalog_passes_validation() {
        for default in DEFAULT_CATEGORIES {
            validation::validate_new_category(&default.to_new_category())
                .unwrap_or_else(|err| panic!("{}: {err}", default.name));
        }
    }

    #[test]
    fn patch_keeps_null_limit_apart_from_absent() {
        let absent: CategoryPatch = serde_json::from_value(serde_json::json!({"name": "Food"})).unwrap();
        assert_eq!(absent.spending_limit, None);

        let cleared: CategoryPatch =
            serde_json::from_value(serde_json::json!({"spendingLimit": null})).unwrap();
        assert_eq!(cleared.spending_limit, Some(None));
        assert!(!cleared.is_empty());

        let set: CategoryPatch =
            serde_json::from_value(serde_json::json!({"spendingLimit": 2500})).unwrap();
        assert_eq!(set.spending_limit, Some(Some(MoneyCents::new(2500))));
    }

    #[test]
    fn cleared_limit_is_written_as_null() {
        let doc = CategoryPatchDoc {
            spending_limit_minor: Some(None),
            ..CategoryPatchDoc::default()
        };
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            serde_json::json!({"spendingLimitMinor": null})
        );
    }
}
