//! Builder for Strapi REST query strings.
use super::model::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
}

impl FilterOp {
    fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "$eq",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub path: Vec<String>,
    pub op: FilterOp,
    pub value: String,
}

/// Strapi document ids are short opaque tokens; anything else is refused
/// before it reaches a URL.
pub fn is_document_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Populate {
    #[default]
    None,
    All,
    Fields(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrapiQuery {
    pub collection: String,
    pub document_id: Option<String>,
    pub locale: Option<Locale>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub filters: Vec<Filter>,
    pub populate: Populate,
    pub sort: Vec<String>,
}

impl StrapiQuery {
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            document_id: None,
            locale: None,
            page: None,
            page_size: None,
            filters: Vec::new(),
            populate: Populate::None,
            sort: Vec::new(),
        }
    }

    pub fn document(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page.max(1));
        self.page_size = Some(page_size.max(1));
        self
    }

    /// `filters[a][b][$op]=value`. `path` is the dotted field path, e.g. `grade.name`.
    pub fn filter(mut self, path: &str, op: FilterOp, value: impl Into<String>) -> Self {
        self.filters.push(Filter {
            path: path.split('.').map(str::to_string).collect(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn populate_all(mut self) -> Self {
        self.populate = Populate::All;
        self
    }

    pub fn populate<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.populate = Populate::Fields(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn sort(mut self, key: impl Into<String>) -> Self {
        self.sort.push(key.into());
        self
    }

    /// Path segments below the Strapi origin, e.g. `["api", "programs", "abc"]`.
    /// Each one is percent-encoded as a single segment when the URL is built.
    pub fn segments(&self) -> Vec<&str> {
        let mut segments = vec!["api", self.collection.as_str()];
        if let Some(id) = &self.document_id {
            segments.push(id);
        }
        segments
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(locale) = self.locale {
            pairs.push(("locale".to_string(), locale.as_str().to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("pagination[page]".to_string(), page.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("pagination[pageSize]".to_string(), size.to_string()));
        }
        for filter in &self.filters {
            let mut key = String::from("filters");
            for segment in &filter.path {
                key.push('[');
                key.push_str(segment);
                key.push(']');
            }
            key.push('[');
            key.push_str(filter.op.as_str());
            key.push(']');
            pairs.push((key, filter.value.clone()));
        }
        match &self.populate {
            Populate::None => {}
            Populate::All => pairs.push(("populate".to_string(), "*".to_string())),
            Populate::Fields(fields) => {
                for (i, field) in fields.iter().enumerate() {
                    pairs.push((format!("populate[{}]", i), field.clone()));
                }
            }
        }
        for (i, key) in self.sort.iter().enumerate() {
            pairs.push((format!("sort[{}]", i), key.clone()));
        }
        pairs
    }
}
