use std::collections::BTreeMap;
use std::fmt;

/// Services bound per request scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceId {
    Responder,
    SuccessBuilder,
    ErrorBuilder,
    Manager,
    Serializer,
    ResourceFactory,
}

impl ServiceId {
    pub const ALL: [ServiceId; 6] = [
        ServiceId::Responder,
        ServiceId::SuccessBuilder,
        ServiceId::ErrorBuilder,
        ServiceId::Manager,
        ServiceId::Serializer,
        ServiceId::ResourceFactory,
    ];

    /// Name of the concrete binding
    pub fn canonical_name(&self) -> &'static str {
        match self {
            ServiceId::Responder => "Responder",
            ServiceId::SuccessBuilder => "SuccessResponseBuilder",
            ServiceId::ErrorBuilder => "ErrorResponseBuilder",
            ServiceId::Manager => "TransformationManager",
            ServiceId::Serializer => "Serializer",
            ServiceId::ResourceFactory => "ResourceFactory",
        }
    }

    pub fn from_canonical_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.canonical_name() == name)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

/// Short lookup keys for the bound services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, ServiceId>,
}

impl AliasTable {
    pub fn empty() -> Self {
        Self {
            aliases: BTreeMap::new(),
        }
    }

    pub fn alias(&mut self, alias: impl Into<String>, service: ServiceId) -> &mut Self {
        self.aliases.insert(alias.into(), service);
        self
    }

    /// Resolve an alias or a canonical binding name
    pub fn resolve(&self, key: &str) -> Option<ServiceId> {
        self.aliases
            .get(key)
            .copied()
            .or_else(|| ServiceId::from_canonical_name(key))
    }

    pub fn aliases_for(&self, service: ServiceId) -> Vec<&str> {
        self.aliases
            .iter()
            .filter(|(_, id)| **id == service)
            .map(|(alias, _)| alias.as_str())
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table
            .alias("responder", ServiceId::Responder)
            .alias("responder.success", ServiceId::SuccessBuilder)
            .alias("responder.error", ServiceId::ErrorBuilder)
            .alias("responder.manager", ServiceId::Manager)
            .alias("responder.serializer", ServiceId::Serializer);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aliases() {
        let table = AliasTable::default();
        assert_eq!(table.resolve("responder"), Some(ServiceId::Responder));
        assert_eq!(table.resolve("responder.success"), Some(ServiceId::SuccessBuilder));
        assert_eq!(table.resolve("responder.error"), Some(ServiceId::ErrorBuilder));
        assert_eq!(table.resolve("responder.manager"), Some(ServiceId::Manager));
        assert_eq!(table.resolve("responder.serializer"), Some(ServiceId::Serializer));
        assert_eq!(table.keys().count(), 5);
    }

    #[test]
    fn test_canonical_names_resolve() {
        let table = AliasTable::default();
        for id in ServiceId::ALL {
            assert_eq!(table.resolve(id.canonical_name()), Some(id));
        }
        assert_eq!(table.resolve("responder.cache"), None);
    }

    #[test]
    fn test_custom_alias() {
        let mut table = AliasTable::default();
        table.alias("api", ServiceId::Responder);
        assert_eq!(table.aliases_for(ServiceId::Responder), vec!["api", "responder"]);
    }
}
