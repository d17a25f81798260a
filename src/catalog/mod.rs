//! The workstation provisioning plan.
//!
//! Package names and commands live here. The engine in [`crate::steps`]
//! and [`crate::session`] knows nothing about Fedora.

pub mod desktop;
pub mod fonts;
pub mod gpu;
pub mod media;
pub mod packages;
pub mod repos;
pub mod system;

use crate::config::Settings;
use crate::steps::Step;

/// The ordered step list for a Fedora workstation.
pub fn workstation(settings: &Settings) -> Vec<Step> {
    vec![
        system::hostname(settings),
        repos::rpmfusion(),
        system::upgrade(),
        media::codecs(),
        repos::flathub(settings),
        media::applications(settings),
        gpu::gpu_drivers(),
        desktop::customization(),
        system::login_shell(settings),
        fonts::fonts(settings),
    ]
}
