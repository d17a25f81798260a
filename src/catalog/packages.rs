//! Package tables and package-set guards.

use crate::host::package_probe;
use crate::steps::Guard;

/// RPM Fusion release packages, one per repository.
pub mod rpmfusion {
    pub const FREE: &str = "rpmfusion-free-release";
    pub const NONFREE: &str = "rpmfusion-nonfree-release";
}

/// Multimedia codec packages.
pub mod codecs {
    /// GStreamer plugins installed alongside full ffmpeg.
    pub const GSTREAMER: &[&str] = &[
        "gstreamer1-plugins-bad-free",
        "gstreamer1-plugins-good",
        "gstreamer1-plugins-base",
        "gstreamer1-plugin-openh264",
        "gstreamer1-libav",
        "lame",
    ];
}

/// GPU driver packages.
pub mod gpu {
    /// NVIDIA proprietary driver, built as a kernel module by akmods.
    pub const NVIDIA: &[&str] = &["akmod-nvidia", "xorg-x11-drv-nvidia-cuda"];

    /// Mesa drivers with patent-encumbered codecs enabled, as
    /// `(stock, freeworld)` swaps.
    pub const AMD_SWAPS: &[(&str, &str)] = &[
        ("mesa-va-drivers", "mesa-va-drivers-freeworld"),
        ("mesa-vdpau-drivers", "mesa-vdpau-drivers-freeworld"),
    ];

    /// Intel VA-API media driver.
    pub const INTEL: &[&str] = &["intel-media-driver", "libva-utils"];
}

/// Desktop customization packages.
pub mod desktop {
    pub const GNOME: &[&str] = &["gnome-tweaks", "gnome-extensions-app"];
    pub const KDE: &[&str] = &["kde-gtk-config", "kvantum"];
}

/// Satisfied when every package in `packages` is installed.
pub fn all_installed(packages: &[&str]) -> Guard {
    let probes: Vec<String> = packages.iter().map(|p| package_probe(p)).collect();
    Guard::new(
        format!("{} already installed", packages.join(", ")),
        move |host| probes.iter().all(|probe| host.probe(probe)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;

    #[test]
    fn all_installed_requires_every_package() {
        let mut host = MockHost::new();
        host.mark_installed("akmod-nvidia");

        let guard = all_installed(gpu::NVIDIA);
        assert!(!guard.check(&mut host).satisfied);

        host.mark_installed("xorg-x11-drv-nvidia-cuda");
        let result = guard.check(&mut host);
        assert!(result.satisfied);
        assert_eq!(
            result.description,
            "akmod-nvidia, xorg-x11-drv-nvidia-cuda already installed"
        );
    }
}
