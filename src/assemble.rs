//! Builds the output module from the compiler declarations.

use std::path::Path;

use tracing::{debug, info};

use crate::clone::clone_kind;
use crate::config::{BrandConfig, Config};
use crate::dts::{DeclarationKind, DtsFile, DtsType, InterfaceMember, Primitive, PropertyMember};
use crate::error::{GenerateError, Result};
use crate::module::{ImportDeclaration, OutputModule, RuntimeStatement, WrappingNamespace};
use crate::rewrite::{apply_rules, QualifyRule};
use crate::separation::{Placement, SeparationPolicy};
use crate::source::{flatten, DeclarationSource, SourceDeclaration, SourceNamespace};

/// Kinds hoisted to the top level, in emission order.
const HOISTED_ORDER: [DeclarationKind; 3] = [
    DeclarationKind::Enum,
    DeclarationKind::Interface,
    DeclarationKind::TypeAlias,
];

/// Kinds cloned into the wrapping namespace, in emission order.
const NESTED_ORDER: [DeclarationKind; 7] = DeclarationKind::CLONE_ORDER;

/// Everything needed to turn a parsed declaration file into an output module.
#[derive(Debug, Clone)]
pub struct Assembler<'a> {
    config: &'a Config,
    policy: SeparationPolicy,
    rules: Vec<QualifyRule>,
    compiler_version: Option<String>,
}

impl<'a> Assembler<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        Ok(Self {
            config,
            policy: config.separation_policy()?,
            rules: config.qualify_rules(),
            compiler_version: None,
        })
    }

    /// Record the compiler version for the header comment.
    pub fn with_compiler_version(mut self, version: Option<String>) -> Self {
        self.compiler_version = version;
        self
    }

    pub fn assemble(&self, file: &DtsFile, path: &Path) -> Result<OutputModule> {
        let config = self.config;
        let namespaces = DeclarationSource::new(file).namespaces_named(&config.source_namespace);
        if namespaces.is_empty() {
            return Err(GenerateError::MissingNamespace(
                config.source_namespace.clone(),
            ));
        }
        info!(
            namespace = %config.source_namespace,
            blocks = namespaces.len(),
            "assembling output module"
        );

        let mut module = OutputModule::new(path);

        module.imports.push(ImportDeclaration::Namespace {
            alias: config.compiler_alias.clone(),
            module: config.compiler_module.clone(),
        });
        module.imports.push(ImportDeclaration::Named {
            names: vec![config.merge_utility.clone()],
            module: config.merge_utility_module.clone(),
        });

        for kind in HOISTED_ORDER {
            let hoisted = self.select(&namespaces, kind, Placement::Hoisted);
            clone_kind(&mut module, kind, hoisted)?;
        }

        apply_rules(&mut module, &self.rules, &config.namespace)?;

        let mut namespace = WrappingNamespace::new(&config.namespace);
        for kind in NESTED_ORDER {
            let nested = self.select(&namespaces, kind, Placement::Nested);
            clone_kind(&mut namespace, kind, nested)?;
        }

        inject_brand(&mut namespace, &config.brand)?;

        module.header = Some(header_comment(self.compiler_version.as_deref()));

        namespace.runtime.push(RuntimeStatement::MergeAssign {
            utility: config.merge_utility.clone(),
            target: config.namespace.clone(),
            source: config.compiler_alias.clone(),
        });
        module.namespace = Some(namespace);

        info!(
            hoisted = module.items.len(),
            nested = module.namespace.as_ref().map_or(0, |ns| ns.items.len()),
            "assembled output module"
        );
        Ok(module)
    }

    /// Flattened declarations of `kind` that classify as `placement`.
    fn select<'s>(
        &self,
        namespaces: &[SourceNamespace<'s>],
        kind: DeclarationKind,
        placement: Placement,
    ) -> Vec<SourceDeclaration<'s>> {
        flatten(namespaces, kind)
            .into_iter()
            .filter(|decl| self.policy.classify(kind, decl.name()) == placement)
            .collect()
    }
}

/// Add the brand property to the designated interface.
pub fn inject_brand(namespace: &mut WrappingNamespace, brand: &BrandConfig) -> Result<()> {
    let interface = namespace
        .interface_mut(&brand.interface)
        .ok_or_else(|| GenerateError::BrandTargetMissing(brand.interface.clone()))?;

    interface
        .members
        .push(InterfaceMember::Property(PropertyMember {
            name: brand.property.clone(),
            doc: Some(brand.doc.clone()),
            ty: Some(DtsType::Primitive(Primitive::Undefined)),
            optional: false,
            readonly: false,
        }));
    debug!(interface = %brand.interface, property = %brand.property, "injected brand");
    Ok(())
}

/// The comment block placed at position 0 of the module.
pub fn header_comment(compiler_version: Option<&str>) -> String {
    let version = match compiler_version {
        Some(version) => format!("TypeScript compiler declarations, version {version}."),
        None => "TypeScript compiler declarations.".to_string(),
    };
    format!(
        "/* eslint-disable */\n\
         /*\n \
         * {version}\n \
         *\n \
         * Generated by dts-rewrap from typescript.d.ts. Do not edit; every run\n \
         * replaces this file.\n \
         *\n \
         * The declarations are Copyright (c) Microsoft Corporation and licensed\n \
         * under the Apache License, Version 2.0.\n \
         */"
    )
}
