//! Display mode tracking
//!
//! Keeps the power mode, visibility and display capabilities reported by the
//! host. The periodic tick may only run while [`DisplayModeState::should_run`]
//! holds.

/// Power mode of the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Full color, redrawn every second
    #[default]
    Interactive,
    /// Low power, redrawn once per minute by the host
    Ambient,
}

impl Mode {
    pub fn from_ambient(ambient: bool) -> Self {
        if ambient {
            Mode::Ambient
        } else {
            Mode::Interactive
        }
    }
}

/// Whether the face is currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Visibility {
    Visible,
    #[default]
    Hidden,
}

impl Visibility {
    pub fn from_visible(visible: bool) -> Self {
        if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }
}

/// Display capabilities of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapabilityFlags {
    /// Ambient mode supports fewer bits per color, anti-aliasing must be off
    pub reduced_color_ambient: bool,
    /// Static pixels may burn in while in ambient mode
    pub burn_in_risk: bool,
}

/// Current mode, visibility and capabilities of the display
#[derive(Debug, Clone, Default)]
pub struct DisplayModeState {
    mode: Mode,
    visibility: Visibility,
    capabilities: CapabilityFlags,
}

impl DisplayModeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the power mode. Returns whether the mode changed.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.mode == mode {
            return false;
        }
        debug!("Display mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        true
    }

    /// Switch visibility. Returns whether visibility changed.
    pub fn set_visibility(&mut self, visibility: Visibility) -> bool {
        if self.visibility == visibility {
            return false;
        }
        debug!("Visibility {:?} -> {:?}", self.visibility, visibility);
        self.visibility = visibility;
        true
    }

    /// Replace the capability flags. Returns whether they changed.
    pub fn set_capabilities(&mut self, capabilities: CapabilityFlags) -> bool {
        if self.capabilities == capabilities {
            return false;
        }
        debug!(
            "Capabilities changed: reduced color {}, burn-in {}",
            capabilities.reduced_color_ambient,
            capabilities.burn_in_risk
        );
        self.capabilities = capabilities;
        true
    }

    /// The periodic tick only runs while visible and interactive.
    pub fn should_run(&self) -> bool {
        self.visibility == Visibility::Visible && self.mode == Mode::Interactive
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn capabilities(&self) -> CapabilityFlags {
        self.capabilities
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }
}
