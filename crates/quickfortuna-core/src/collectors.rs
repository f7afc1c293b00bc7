//! Host-event adapters: the bridge between environment noise and the
//! entropy router.
//!
//! The generator never watches the environment itself. The host observes
//! pointer motion, keystrokes, sensor readings and opaque context strings,
//! wraps each one in a [`HostEvent`], and hands it to [`Fortuna::collect`].
//! Each adapter fixes the payload shape, the source tag, and a deliberately
//! conservative entropy credit: a pointer position is worth 2 bits no
//! matter how wildly the pointer moved.
//!
//! Events are dropped unless collectors have been started, mirroring
//! listener attach/detach in event-driven hosts.

use crate::generator::Fortuna;

/// One observation from the host environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent<'a> {
    /// Pointer moved to `(x, y)`. Credited 2 bits, tag `"mouse"`.
    PointerMove { x: u32, y: u32 },
    /// Key pressed; pass the character code or key code, whichever the host
    /// has. Credited 1 bit, tag `"keyboard"`.
    Keystroke(u32),
    /// Accelerometer sample and device orientation; absent axes are simply
    /// omitted. Credited 3 bits, tag `"accelerometer"`.
    Accelerometer {
        ax: Option<u32>,
        ay: Option<u32>,
        az: Option<u32>,
        orientation: Option<u32>,
    },
    /// Host location string (URL, path, ...). Credited 0 bits, stirring
    /// only, tag `"location"`.
    Location(&'a str),
    /// Host cookie or similar ambient string. Credited 0 bits, tag
    /// `"cookie"`.
    Cookie(&'a str),
}

impl Fortuna {
    /// Feed one host event through the matching adapter.
    ///
    /// No-op while collectors are stopped.
    pub fn collect(&mut self, event: HostEvent<'_>) {
        if !self.collectors_started() {
            return;
        }
        match event {
            HostEvent::PointerMove { x, y } => {
                let payload = [x, y];
                self.add_entropy(&payload[..], Some(2), "mouse");
            }
            HostEvent::Keystroke(code) => {
                self.add_entropy(code, Some(1), "keyboard");
            }
            HostEvent::Accelerometer {
                ax,
                ay,
                az,
                orientation,
            } => {
                let payload: Vec<u32> = [ax, ay, az, orientation].into_iter().flatten().collect();
                if payload.is_empty() {
                    self.add_entropy("", Some(3), "accelerometer");
                } else {
                    self.add_entropy(&payload[..], Some(3), "accelerometer");
                }
            }
            HostEvent::Location(s) => {
                self.add_entropy(s, Some(0), "location");
            }
            HostEvent::Cookie(s) => {
                self.add_entropy(s, Some(0), "cookie");
            }
        }
    }
}
