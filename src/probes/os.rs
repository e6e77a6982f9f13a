//! Operating-system classification.

use super::ProbeContext;
use crate::shell::Invocation;
use crate::status::{OsFact, OsKind};
use std::fs;

/// Environment variables only WSL sets inside the Linux side.
const WSL_ENV_VARS: &[&str] = &["WSL_DISTRO_NAME", "WSL_INTEROP", "WSLENV"];

/// Classify the host and describe its release.
pub fn probe(ctx: &ProbeContext<'_>) -> OsFact {
    let kernel = read_kernel_release(ctx);
    let kind = classify(&ctx.os_family, kernel.as_deref(), |key| ctx.var(key));
    let version = release_name(ctx, kind, kernel.as_deref());
    let wsl_version = match (kind, kernel.as_deref()) {
        (OsKind::Wsl, Some(k)) => Some(wsl_generation(k)),
        _ => None,
    };

    tracing::debug!("OS: {} ({})", kind, version);

    OsFact {
        kind,
        version,
        wsl_version,
    }
}

/// Classification policy, first match wins:
/// 1. a Linux kernel release mentioning Microsoft/WSL
/// 2. a WSL environment variable on Linux
/// 3. the platform family
pub fn classify<F>(family: &str, kernel: Option<&str>, var: F) -> OsKind
where
    F: Fn(&str) -> Option<String>,
{
    if family == "linux" {
        if let Some(kernel) = kernel {
            let lower = kernel.to_lowercase();
            if lower.contains("microsoft") || lower.contains("wsl") {
                return OsKind::Wsl;
            }
        }
        if WSL_ENV_VARS.iter().any(|key| var(key).is_some()) {
            return OsKind::Wsl;
        }
    }

    match family {
        "windows" => OsKind::WindowsNative,
        "linux" => OsKind::Linux,
        "macos" => OsKind::MacOs,
        _ => OsKind::Unknown,
    }
}

/// WSL 2 kernels are built as `*-microsoft-standard*`.
fn wsl_generation(kernel: &str) -> u8 {
    let lower = kernel.to_lowercase();
    if lower.contains("microsoft-standard") || lower.contains("wsl2") {
        2
    } else {
        1
    }
}

fn read_kernel_release(ctx: &ProbeContext<'_>) -> Option<String> {
    ["proc/version", "proc/sys/kernel/osrelease"]
        .iter()
        .find_map(|rel| fs::read_to_string(ctx.system_root.join(rel)).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn release_name(ctx: &ProbeContext<'_>, kind: OsKind, kernel: Option<&str>) -> String {
    match kind {
        OsKind::Linux | OsKind::Wsl => linux_release(ctx)
            .or_else(|| kernel.map(str::to_string))
            .unwrap_or_else(|| "Linux".to_string()),
        OsKind::MacOs => command_output(ctx, Invocation::new("sw_vers").arg("-productVersion"))
            .map(|v| format!("macOS {}", v))
            .unwrap_or_else(|| "macOS".to_string()),
        OsKind::WindowsNative => command_output(ctx, Invocation::new("cmd").args(["/C", "ver"]))
            .unwrap_or_else(|| "Windows".to_string()),
        OsKind::Unknown => ctx.os_family.clone(),
    }
}

fn linux_release(ctx: &ProbeContext<'_>) -> Option<String> {
    let root = &ctx.system_root;
    if let Ok(text) = fs::read_to_string(root.join("etc/os-release")) {
        if let Some(name) = key_value(&text, "PRETTY_NAME") {
            return Some(name);
        }
    }
    if let Ok(text) = fs::read_to_string(root.join("etc/lsb-release")) {
        if let Some(name) = key_value(&text, "DISTRIB_DESCRIPTION") {
            return Some(name);
        }
    }
    command_output(ctx, Invocation::new("lsb_release").arg("-d")).map(|out| {
        out.split_once(':')
            .map(|(_, v)| v.trim().to_string())
            .unwrap_or(out)
    })
}

/// Value of `KEY=value` or `KEY="value"` in a shell-style key file.
fn key_value(text: &str, key: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        if k.trim() != key {
            return None;
        }
        let v = v.trim().trim_matches('"').trim_matches('\'').trim();
        (!v.is_empty()).then(|| v.to_string())
    })
}

fn command_output(ctx: &ProbeContext<'_>, invocation: Invocation) -> Option<String> {
    let invocation = invocation.timeout(ctx.command_timeout);
    match ctx.runner.run(&invocation) {
        Ok(result) if result.success => {
            let out = result.stdout.trim().to_string();
            (!out.is_empty()).then_some(out)
        }
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("{} unavailable: {}", invocation.program, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::testing::make_env;
    use crate::shell::{FakeResponse, FakeRunner};
    use std::path::Path;
    use tempfile::TempDir;

    fn no_vars(_: &str) -> Option<String> {
        None
    }

    fn fake_root(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = temp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        temp
    }

    #[test]
    fn kernel_marker_means_wsl() {
        let kernel = "Linux version 5.15.90.1-microsoft-standard-WSL2";
        assert_eq!(classify("linux", Some(kernel), no_vars), OsKind::Wsl);
    }

    #[test]
    fn env_var_means_wsl() {
        let var = |k: &str| (k == "WSL_DISTRO_NAME").then(|| "Ubuntu".to_string());
        assert_eq!(classify("linux", Some("Linux version 6.1.0"), var), OsKind::Wsl);
    }

    #[test]
    fn wsl_markers_ignored_off_linux() {
        let var = |k: &str| (k == "WSLENV").then(|| "PATH/l".to_string());
        assert_eq!(classify("windows", None, var), OsKind::WindowsNative);
    }

    #[test]
    fn falls_back_to_family() {
        assert_eq!(classify("linux", Some("Linux version 6.1.0"), no_vars), OsKind::Linux);
        assert_eq!(classify("macos", None, no_vars), OsKind::MacOs);
        assert_eq!(classify("freebsd", None, no_vars), OsKind::Unknown);
    }

    #[test]
    fn wsl_generations() {
        assert_eq!(wsl_generation("4.4.0-19041-Microsoft"), 1);
        assert_eq!(wsl_generation("5.15.90.1-microsoft-standard-WSL2"), 2);
    }

    #[test]
    fn key_value_strips_quotes() {
        let text = "NAME=\"Ubuntu\"\nPRETTY_NAME=\"Ubuntu 22.04.3 LTS\"\n";
        assert_eq!(key_value(text, "PRETTY_NAME").as_deref(), Some("Ubuntu 22.04.3 LTS"));
        assert_eq!(key_value(text, "VERSION"), None);
    }

    #[test]
    fn probe_reads_fake_system_root() {
        let root = fake_root(&[
            ("proc/version", "Linux version 5.15.90.1-microsoft-standard-WSL2"),
            ("etc/os-release", "PRETTY_NAME=\"Ubuntu 22.04.3 LTS\"\n"),
        ]);
        let env = make_env(&[]);
        let runner = FakeRunner::new();
        let ctx = ProbeContext::new(Path::new("/proj"), &runner, &env)
            .with_system_root(root.path())
            .with_os_family("linux");

        let fact = probe(&ctx);
        assert_eq!(fact.kind, OsKind::Wsl);
        assert_eq!(fact.version, "Ubuntu 22.04.3 LTS");
        assert_eq!(fact.wsl_version, Some(2));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn probe_falls_back_to_lsb_release_command() {
        let root = fake_root(&[("proc/version", "Linux version 6.1.0-generic")]);
        let env = make_env(&[]);
        let runner = FakeRunner::new().respond(
            "lsb_release -d",
            FakeResponse::Success("Description:\tDebian GNU/Linux 12\n".into()),
        );
        let ctx = ProbeContext::new(Path::new("/proj"), &runner, &env)
            .with_system_root(root.path())
            .with_os_family("linux");

        let fact = probe(&ctx);
        assert_eq!(fact.kind, OsKind::Linux);
        assert_eq!(fact.version, "Debian GNU/Linux 12");
        assert_eq!(fact.wsl_version, None);
    }

    #[test]
    fn probe_degrades_without_any_release_info() {
        let root = TempDir::new().unwrap();
        let env = make_env(&[]);
        let runner = FakeRunner::new();
        let ctx = ProbeContext::new(Path::new("/proj"), &runner, &env)
            .with_system_root(root.path())
            .with_os_family("linux");

        let fact = probe(&ctx);
        assert_eq!(fact.kind, OsKind::Linux);
        assert_eq!(fact.version, "Linux");
    }

    #[test]
    fn macos_version_from_sw_vers() {
        let env = make_env(&[]);
        let runner = FakeRunner::new()
            .respond("sw_vers -productVersion", FakeResponse::Success("14.2.1\n".into()));
        let ctx = ProbeContext::new(Path::new("/proj"), &runner, &env).with_os_family("macos");
        let fact = probe(&ctx);
        assert_eq!(fact.kind, OsKind::MacOs);
        assert_eq!(fact.version, "macOS 14.2.1");
    }
}
