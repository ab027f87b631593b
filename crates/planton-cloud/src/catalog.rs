//! Kind to module dispatch

use crate::error::{CloudError, Result};
use crate::module::ResourceModule;
use planton_registry::CloudResourceKind;
use std::collections::BTreeMap;

/// Registered IaC modules, one per kind
#[derive(Default)]
pub struct ModuleCatalog {
    modules: BTreeMap<CloudResourceKind, Box<dyn ResourceModule>>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module; a later registration for the same kind replaces the earlier
    pub fn register(&mut self, module: Box<dyn ResourceModule>) {
        let kind = module.kind();
        if self.modules.insert(kind, module).is_some() {
            tracing::warn!(kind = %kind, "Replaced existing module");
        }
    }

    pub fn get(&self, kind: CloudResourceKind) -> Option<&dyn ResourceModule> {
        self.modules.get(&kind).map(|m| m.as_ref())
    }

    /// Like [`ModuleCatalog::get`], failing with `ModuleNotFound`
    pub fn require(&self, kind: CloudResourceKind) -> Result<&dyn ResourceModule> {
        self.get(kind).ok_or(CloudError::ModuleNotFound(kind))
    }

    pub fn contains(&self, kind: CloudResourceKind) -> bool {
        self.modules.contains_key(&kind)
    }

    /// Kinds with a module, in enum order
    pub fn kinds(&self) -> Vec<CloudResourceKind> {
        self.modules.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl std::fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleCatalog")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Program;
    use planton_stackinput::StackInput;

    impl std::fmt::Debug for dyn ResourceModule + '_ {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_tuple("ResourceModule").field(&self.kind()).finish()
        }
    }

    struct NoopModule(CloudResourceKind);

    impl ResourceModule for NoopModule {
        fn kind(&self) -> CloudResourceKind {
            self.0
        }

        fn validate(&self, _input: &StackInput) -> Result<()> {
            Ok(())
        }

        fn program(&self, input: &StackInput) -> Result<Program> {
            Ok(Program::for_manifest(&input.target))
        }

        fn output_keys(&self) -> &'static [&'static str] {
            &[]
        }
    }

    #[test]
    fn test_register_and_require() {
        let mut catalog = ModuleCatalog::new();
        assert!(catalog.is_empty());

        catalog.register(Box::new(NoopModule(CloudResourceKind::AwsSecurityGroup)));
        catalog.register(Box::new(NoopModule(CloudResourceKind::AwsDynamodb)));
        catalog.register(Box::new(NoopModule(CloudResourceKind::AwsDynamodb)));

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains(CloudResourceKind::AwsDynamodb));
        assert_eq!(
            catalog.require(CloudResourceKind::AwsDynamodb).unwrap().kind(),
            CloudResourceKind::AwsDynamodb
        );

        let err = catalog.require(CloudResourceKind::GcpGkeCluster).unwrap_err();
        assert!(matches!(
            err,
            CloudError::ModuleNotFound(CloudResourceKind::GcpGkeCluster)
        ));
    }

    #[test]
    fn test_kinds_are_ordered() {
        let mut catalog = ModuleCatalog::new();
        catalog.register(Box::new(NoopModule(CloudResourceKind::GcpDnsZone)));
        catalog.register(Box::new(NoopModule(CloudResourceKind::AwsDynamodb)));
        assert_eq!(
            catalog.kinds(),
            vec![CloudResourceKind::AwsDynamodb, CloudResourceKind::GcpDnsZone]
        );
    }
}
