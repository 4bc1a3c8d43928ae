use crate::cli::Flavor;

/// Installed on every image.
const BASE_PACKAGES: &[&str] = &[
    // Core system
    "apt",
    "systemd",
    "systemd-sysv",
    "udev",
    "kmod",
    "locales",
    "sudo",
    // Networking
    "netbase",
    "net-tools",
    "ethtool",
    "iproute2",
    "iputils-ping",
    "ifupdown",
    "dhcpcd5",
    "firmware-brcm80211",
    "wpasupplicant",
    "ntp",
    // On-device maintenance tooling
    "dialog",
    "stress",
    "wireless-tools",
    "parted",
    // TLS roots for the updater
    "ca-certificates",
];

const LITE_PACKAGES: &[&str] = &["ssh", "avahi-daemon"];
const DESKTOP_PACKAGES: &[&str] = &["task-lxde-desktop"];
const DEBUG_PACKAGES: &[&str] = &["device-tree-compiler", "strace", "vim", "less"];

/// Final package list: the base set, then the flavor add-ons, then the debug
/// add-ons when enabled.
pub fn resolve(flavor: Flavor, debug: bool) -> Vec<String> {
    let mut packages: Vec<String> = BASE_PACKAGES.iter().map(|p| p.to_string()).collect();

    let flavor_set = match flavor {
        Flavor::Lite => LITE_PACKAGES,
        Flavor::Desktop => DESKTOP_PACKAGES,
    };
    packages.extend(flavor_set.iter().map(|p| p.to_string()));

    if debug {
        packages.extend(DEBUG_PACKAGES.iter().map(|p| p.to_string()));
    }

    packages
}
