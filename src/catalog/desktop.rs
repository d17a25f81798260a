//! Desktop customization.

use super::packages::{all_installed, desktop};
use crate::host::Privilege;
use crate::steps::{Action, Guard, SelectionLoop, Step};

const GNOME_BUTTONS: &str = "appmenu:minimize,maximize,close";

fn gnome() -> Vec<Action> {
    vec![
        Action::best_effort("Install GNOME tools", |ctx| {
            ctx.install_packages(desktop::GNOME)
        })
        .guarded_by(all_installed(desktop::GNOME)),
        Action::best_effort("Show minimize and maximize buttons", |ctx| {
            ctx.run(
                &format!(
                    "gsettings set org.gnome.desktop.wm.preferences button-layout '{}'",
                    GNOME_BUTTONS
                ),
                Privilege::User,
            )
            .map(|_| ())
        })
        .guarded_by(Guard::probe(
            "window buttons are already shown",
            format!(
                "gsettings get org.gnome.desktop.wm.preferences button-layout | grep -qF '{}'",
                GNOME_BUTTONS
            ),
        )),
        Action::best_effort("Enable tap to click", |ctx| {
            ctx.run(
                "gsettings set org.gnome.desktop.peripherals.touchpad tap-to-click true",
                Privilege::User,
            )
            .map(|_| ())
        }),
    ]
}

fn kde() -> Vec<Action> {
    vec![
        Action::best_effort("Install KDE theming tools", |ctx| {
            ctx.install_packages(desktop::KDE)
        })
        .guarded_by(all_installed(desktop::KDE)),
        Action::best_effort("Use double click to open files", |ctx| {
            ctx.run(
                "kwriteconfig6 --file kdeglobals --group KDE --key SingleClick false",
                Privilege::User,
            )
            .map(|_| ())
        }),
    ]
}

/// Customization menu, presented until the user picks "Done".
pub fn customization() -> Step {
    Step::selection(
        "desktop",
        "Desktop customization",
        SelectionLoop::new("Select a desktop to customize:", "Done")
            .option("GNOME", gnome())
            .option("KDE Plasma", kde()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepBody;

    #[test]
    fn menu_has_done_last() {
        let step = customization();
        let StepBody::Selection(selection) = step.body() else {
            panic!("expected selection");
        };
        assert_eq!(selection.labels(), vec!["GNOME", "KDE Plasma", "Done"]);
        assert_eq!(selection.terminator(), "Done");
    }
}
