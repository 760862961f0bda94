// Settings ///////////////////////////////////////////////////////////////////
// This module contains the numeric tunables for the editor.

// Pointer Gestures ///////////////////////////////////////////////////////////

/// Pixel travel beyond which a press/release pair counts as a drag rather
/// than a click. Drags never trigger click semantics on release.
pub const CLICK_DRAG_THRESHOLD_PX: f32 = 5.0;

// Nudge Settings /////////////////////////////////////////////////////////////

/// The amount to nudge the selection by in each direction (in plan units)
pub const NUDGE_AMOUNT: f32 = 0.1;
/// The amount to nudge when shift is held (for larger movements)
pub const SHIFT_NUDGE_AMOUNT: f32 = 1.0;

// Paste //////////////////////////////////////////////////////////////////////

/// Offset applied to pasted copies so they do not land exactly on their
/// sources (in plan units, applied on x and y).
pub const PASTE_OFFSET: f32 = 0.5;

// Camera /////////////////////////////////////////////////////////////////////

/// Orbit sensitivity in radians per pixel of mouse motion.
pub const ORBIT_SENSITIVITY: f32 = 0.005;

/// Minimum and maximum orbit distance from the focus point.
pub const MIN_ORBIT_DISTANCE: f32 = 2.0;
pub const MAX_ORBIT_DISTANCE: f32 = 200.0;
