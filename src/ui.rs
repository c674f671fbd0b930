//! HUD text handed to the text renderer

use crate::sim::Sandbox;

pub const HELP_TEXT: &str = "Click: Fire\n1-4: Select Ammo\n+/-: Power  W/S: Angle\n[/]: Launcher  P: Pause  R: Reset";

/// "Current Ammo: Laser | Power: 5 | Angle: 0"
pub fn status_line(sandbox: &Sandbox) -> String {
    let mut line = format!("Current Ammo: {}", sandbox.current_shot.name());
    if let Some(launcher) = sandbox.active_launcher() {
        line.push_str(&format!(" | Power: {} | Angle: {}", launcher.power(), launcher.angle()));
    }
    if sandbox.paused {
        line.push_str(" | PAUSED");
    }
    line
}

/// "Rounds: 3/16"
pub fn pool_line(sandbox: &Sandbox) -> String {
    format!("Rounds: {}/{}", sandbox.pool.live_count(), sandbox.pool.capacity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::ShotKind;

    #[test]
    fn test_status_line() {
        let mut sandbox = Sandbox::new(Settings::default());
        assert_eq!(status_line(&sandbox), "Current Ammo: Laser | Power: 5 | Angle: 0");

        sandbox.current_shot = ShotKind::Artillery;
        sandbox.paused = true;
        assert_eq!(status_line(&sandbox), "Current Ammo: Artillery | Power: 5 | Angle: 0 | PAUSED");
    }

    #[test]
    fn test_pool_line() {
        let mut sandbox = Sandbox::new(Settings::default());
        sandbox.fire(0);
        assert_eq!(pool_line(&sandbox), "Rounds: 1/16");
    }
}
