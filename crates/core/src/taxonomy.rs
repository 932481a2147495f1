//! The closed category taxonomy queries are routed through.
//!
//! A taxonomy is an ordered list of labels, each with a short description
//! that is only ever shown to the classifier. A [`Category`] can only be
//! obtained by resolving a label against a taxonomy, so holding one means
//! the label is a member of the set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prompt language of a pipeline variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Romanian,
    English,
}

impl Language {
    pub fn from_english_flag(use_english: bool) -> Self {
        if use_english {
            Self::English
        } else {
            Self::Romanian
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Romanian => f.write_str("romanian"),
            Self::English => f.write_str("english"),
        }
    }
}

/// Label of the parking-regulation category in the Romanian taxonomy.
pub const TIMPARK_CATEGORY: &str = "Sistem de parcare, Timpark";

/// A taxonomy entry: the label the model must emit plus a guiding description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub label: String,
    pub description: String,
}

impl CategoryDef {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

/// A label validated against a taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, closed set of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    categories: Vec<CategoryDef>,
}

impl Taxonomy {
    pub fn new(categories: Vec<CategoryDef>) -> Self {
        Self { categories }
    }

    /// Built-in taxonomy for a prompt language.
    pub fn builtin(language: Language) -> Self {
        match language {
            Language::Romanian => Self::romanian(),
            Language::English => Self::english(),
        }
    }

    /// The 15-label taxonomy the Romanian dataset is tagged with.
    pub fn romanian() -> Self {
        Self::from_pairs(&[
            ("Managementul Proprietăților și Activelor", "Decizii care implică administrarea, întreținerea sau modificarea proprietăților și bunurilor publice."),
            ("Managementul Serviciilor Publice și Utilităților", "Hotărâri referitoare la servicii publice esențiale, precum apă, energie, colectarea deșeurilor etc."),
            ("Planificare și Dezvoltare Urbană", "Măsuri pentru dezvoltarea urbanistică, inclusiv planuri de construcție și zonare."),
            ("Guvernanță și Administrație", "Decizii privind organizarea, reglementarea și funcționarea administrației publice locale."),
            ("Legal și Contracte", "Aspecte juridice și contractuale, inclusiv litigii și reglementări."),
            ("Management Financiar și Bugetar", "Hotărâri privind bugetul și gestiunea financiară a resurselor publice."),
            ("Educație și Servicii Sociale", "Decizii în domeniul educației, sănătății, și al serviciilor sociale."),
            ("Reglementarea Pieței și Economiei", "Măsuri pentru reglementarea pieței, economiei locale și comerciale."),
            ("Transport și Infrastructură", "Hotărâri legate de transport public, drumuri și infrastructura locală."),
            ("Managementul Mediului și Energiei", "Decizii referitoare la protecția mediului, sustenabilitate și energie."),
            ("Sănătate și Siguranță", "Hotărâri legate de sănătatea publică și siguranța cetățenilor."),
            ("Cultură și Turism", "Inițiative care sprijină cultura, arta, și turismul."),
            ("Resurse Umane", "Aspecte legate de personalul administrației publice."),
            (TIMPARK_CATEGORY, "Decizii privind reglementarea și administrarea sistemului de parcari Timpark."),
            ("Reabilitare Blocuri", "Hotărâri privind proiectele de reabilitare a blocurilor de locuințe."),
        ])
    }

    /// The reduced 13-label taxonomy of the English dataset.
    pub fn english() -> Self {
        Self::from_pairs(&[
            ("Property and Asset Management", "Decisions on the administration, maintenance or alteration of public property and assets."),
            ("Public Services and Utilities Management", "Decisions on essential public services such as water, energy and waste collection."),
            ("Urban Planning and Development", "Measures for urban development, including construction plans and zoning."),
            ("Governance and Administration", "Decisions on the organisation, regulation and operation of local public administration."),
            ("Legal and Contracts", "Legal and contractual matters, including litigation and regulations."),
            ("Financial and Budget Management", "Decisions on the budget and the financial management of public resources."),
            ("Education and Social Services", "Decisions on education, health and social services."),
            ("Market and Economic Regulation", "Measures regulating the market, the local economy and commerce."),
            ("Transport and Infrastructure", "Decisions on public transport, roads and local infrastructure."),
            ("Environment and Energy Management", "Decisions on environmental protection, sustainability and energy."),
            ("Health and Safety", "Decisions on public health and citizen safety."),
            ("Culture and Tourism", "Initiatives supporting culture, the arts and tourism."),
            ("Parking System, Timpark", "Decisions on the regulation and administration of the Timpark parking system."),
        ])
    }

    fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(label, description)| CategoryDef::new(*label, *description))
                .collect(),
        )
    }

    /// Exact, case-sensitive lookup of a label.
    pub fn resolve(&self, label: &str) -> Option<Category> {
        self.categories
            .iter()
            .find(|c| c.label == label)
            .map(|c| Category(c.label.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryDef> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
