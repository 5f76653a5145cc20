use serde::{Deserialize, Serialize};

/// Project identity as declared by a single manifest file.
///
/// `None` means the manifest does not declare the field at all. `Some("")`
/// is kept as-is: the payload builder only falls back to computed defaults
/// for fields that are truly absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub author: Option<String>,
    pub license: Option<String>,
}

impl ManifestMetadata {
    /// Returns `true` if the manifest declared none of the known fields.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Names of the fields this manifest declares, in declaration order of the struct.
    pub fn declared_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let checks: [(&'static str, bool); 8] = [
            ("name", self.name.is_some()),
            ("version", self.version.is_some()),
            ("description", self.description.is_some()),
            ("homepage", self.homepage.is_some()),
            ("repository", self.repository.is_some()),
            ("keywords", self.keywords.is_some()),
            ("author", self.author.is_some()),
            ("license", self.license.is_some()),
        ];
        for (field, present) in checks {
            if present {
                fields.push(field);
            }
        }
        fields
    }
}
