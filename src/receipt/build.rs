// src/receipt/build.rs

//! Receipt construction from live install context
//!
//! One entry point per kind, plus [`empty`] for packages that were never
//! installed. Builders are pure over their context except for the eager
//! tap head-commit resolution and the generic attributes captured from the
//! running process (install time, CPU architecture). Missing upstream data
//! degrades to null/false/empty defaults; nothing here errors.

use crate::options::Options;
use crate::receipt::dependency::DependencySnapshot;
use crate::receipt::record::{
    CaskReceipt, Common, FormulaReceipt, Receipt, ReceiptKind, DEFAULT_COMPILER,
};
use crate::receipt::source::{BuildSpec, CaskSource, FormulaSource, Versions};
use crate::tap::{head_commit_for, TapLookup};
use chrono::Utc;
use serde_json::Value;

/// Live context for a formula install, assembled by the install workflow
/// immediately around the build.
pub struct InstallContext<'a> {
    pub manager_version: String,
    pub used_options: Options,
    pub unused_options: Options,
    pub built_as_bottle: bool,
    pub poured_from_bottle: bool,
    pub installed_as_dependency: bool,
    pub installed_on_request: bool,
    pub loaded_from_api: bool,
    pub source_path: Option<String>,
    pub tap: Option<String>,
    pub spec: BuildSpec,
    pub stable_version: Option<String>,
    pub head_version: Option<String>,
    pub version_scheme: u32,
    pub compiler: Option<String>,
    pub stdlib: Option<String>,
    pub aliases: Vec<String>,
    pub source_modified_time: i64,
    /// `None` when the dependency set could not be captured.
    pub runtime_dependencies: Option<Vec<DependencySnapshot>>,
    /// Opaque build-environment descriptor from the host.
    pub build_environment: Value,
    pub taps: &'a dyn TapLookup,
}

/// Live context for a cask install.
pub struct CaskInstallContext<'a> {
    pub manager_version: String,
    pub installed_as_dependency: bool,
    pub installed_on_request: bool,
    pub loaded_from_api: bool,
    pub source_path: Option<String>,
    pub tap: Option<String>,
    pub declared_version: String,
    pub caskfile_only: bool,
    pub uninstall_artifacts: Vec<Value>,
    pub runtime_dependencies: Option<Vec<DependencySnapshot>>,
    pub build_environment: Value,
    pub taps: &'a dyn TapLookup,
}

/// Build a formula receipt from a live install.
pub fn for_install(ctx: InstallContext<'_>) -> Receipt {
    let tap_git_head = resolve_tap_head(ctx.taps, ctx.tap.as_deref());
    Receipt::Formula(FormulaReceipt {
        common: Common {
            homebrew_version: ctx.manager_version,
            installed_as_dependency: ctx.installed_as_dependency,
            installed_on_request: ctx.installed_on_request,
            loaded_from_api: ctx.loaded_from_api,
            time: Some(Utc::now().timestamp()),
            arch: Some(std::env::consts::ARCH.to_string()),
            built_on: ctx.build_environment,
            runtime_dependencies: ctx.runtime_dependencies,
        },
        used_options: ctx.used_options,
        unused_options: ctx.unused_options,
        built_as_bottle: ctx.built_as_bottle,
        poured_from_bottle: ctx.poured_from_bottle,
        changed_files: None,
        source_modified_time: ctx.source_modified_time,
        stdlib: ctx.stdlib,
        compiler: ctx.compiler,
        aliases: ctx.aliases,
        source: FormulaSource {
            path: ctx.source_path,
            tap: ctx.tap,
            tap_git_head,
            spec: ctx.spec,
            versions: Versions {
                stable: blank_to_none(ctx.stable_version),
                head: blank_to_none(ctx.head_version),
                version_scheme: ctx.version_scheme,
            },
        },
    })
}

/// Build a cask receipt from a live install.
pub fn for_cask_install(ctx: CaskInstallContext<'_>) -> Receipt {
    let tap_git_head = resolve_tap_head(ctx.taps, ctx.tap.as_deref());
    Receipt::Cask(CaskReceipt {
        common: Common {
            homebrew_version: ctx.manager_version,
            installed_as_dependency: ctx.installed_as_dependency,
            installed_on_request: ctx.installed_on_request,
            loaded_from_api: ctx.loaded_from_api,
            time: Some(Utc::now().timestamp()),
            arch: Some(std::env::consts::ARCH.to_string()),
            built_on: ctx.build_environment,
            runtime_dependencies: ctx.runtime_dependencies,
        },
        caskfile_only: ctx.caskfile_only,
        uninstall_artifacts: ctx.uninstall_artifacts,
        source: CaskSource {
            path: ctx.source_path,
            tap: ctx.tap,
            tap_git_head,
            version: ctx.declared_version,
        },
    })
}

/// Placeholder receipt for a package that was never installed.
///
/// Booleans false, sequences empty, the stable spec at scheme 0, and the
/// compiler pinned to the ambient default, so callers can treat "no
/// receipt" exactly like any other record.
pub fn empty(kind: ReceiptKind) -> Receipt {
    match kind {
        ReceiptKind::Formula => Receipt::Formula(FormulaReceipt {
            compiler: Some(DEFAULT_COMPILER.to_string()),
            ..Default::default()
        }),
        ReceiptKind::Cask => Receipt::Cask(CaskReceipt::default()),
    }
}

fn resolve_tap_head(taps: &dyn TapLookup, tap: Option<&str>) -> Option<String> {
    head_commit_for(taps, tap?)
}

fn blank_to_none(version: Option<String>) -> Option<String> {
    version.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tap::{NoTaps, StaticTaps, TapRef};

    fn context(taps: &dyn TapLookup) -> InstallContext<'_> {
        InstallContext {
            manager_version: "5.0.0".to_string(),
            used_options: Options::from_flags(["with-tests"]),
            unused_options: Options::default(),
            built_as_bottle: false,
            poured_from_bottle: false,
            installed_as_dependency: false,
            installed_on_request: true,
            loaded_from_api: false,
            source_path: Some("/opt/cellar/taps/homebrew/core/Formula/foo.rb".to_string()),
            tap: Some("homebrew/core".to_string()),
            spec: BuildSpec::Stable,
            stable_version: Some("1.2.3".to_string()),
            head_version: None,
            version_scheme: 0,
            compiler: Some("clang".to_string()),
            stdlib: None,
            aliases: vec![],
            source_modified_time: 1_700_000_000,
            runtime_dependencies: Some(vec![DependencySnapshot::new("zlib", "1.3")]),
            build_environment: serde_json::json!({"os": "linux"}),
            taps,
        }
    }

    #[test]
    fn test_for_install_source_build() {
        let receipt = for_install(context(&NoTaps));
        let formula = receipt.as_formula().unwrap();
        assert!(receipt.has_option("with-tests"));
        assert!(!formula.poured_from_bottle);
        assert!(formula.common.time.is_some());
        assert_eq!(formula.source.versions.stable.as_deref(), Some("1.2.3"));
        assert_eq!(formula.source.tap_git_head, None);
    }

    #[test]
    fn test_for_install_captures_head_of_installed_tap() {
        let taps = StaticTaps::new(vec![TapRef {
            name: "homebrew/core".to_string(),
            head_commit: Some("deadbeef".to_string()),
            installed: true,
        }]);
        let receipt = for_install(context(&taps));
        assert_eq!(
            receipt.as_formula().unwrap().source.tap_git_head.as_deref(),
            Some("deadbeef")
        );
    }

    #[test]
    fn test_for_install_normalizes_blank_versions() {
        let mut ctx = context(&NoTaps);
        ctx.stable_version = Some(String::new());
        let receipt = for_install(ctx);
        assert_eq!(receipt.as_formula().unwrap().source.versions.stable, None);
    }

    #[test]
    fn test_for_cask_install() {
        let receipt = for_cask_install(CaskInstallContext {
            manager_version: "5.0.0".to_string(),
            installed_as_dependency: false,
            installed_on_request: true,
            loaded_from_api: true,
            source_path: None,
            tap: Some("homebrew/cask".to_string()),
            declared_version: "2.4.1".to_string(),
            caskfile_only: false,
            uninstall_artifacts: vec![serde_json::json!({"app": ["Foo.app"]})],
            runtime_dependencies: None,
            build_environment: Value::Null,
            taps: &NoTaps,
        });
        let cask = receipt.as_cask().unwrap();
        assert_eq!(cask.source.version, "2.4.1");
        assert_eq!(cask.uninstall_artifacts.len(), 1);
        assert!(cask.common.loaded_from_api);
    }

    #[test]
    fn test_empty_formula_receipt() {
        let receipt = empty(ReceiptKind::Formula);
        let formula = receipt.as_formula().unwrap();
        assert!(!formula.built_as_bottle);
        assert!(formula.used_options.is_empty());
        assert_eq!(formula.source.spec, BuildSpec::Stable);
        assert_eq!(formula.source.versions.version_scheme, 0);
        assert_eq!(receipt.toolchain(), (None, DEFAULT_COMPILER));
    }

    #[test]
    fn test_empty_cask_receipt() {
        let receipt = empty(ReceiptKind::Cask);
        let cask = receipt.as_cask().unwrap();
        assert!(cask.uninstall_artifacts.is_empty());
        assert!(!cask.caskfile_only);
        assert_eq!(cask.common.time, None);
    }
}
