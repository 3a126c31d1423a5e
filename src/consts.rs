// ===
// Reader constants
// ===
// Default relative position of a slice, the middle of the axis
pub const DEFAULT_SLICE_POSITION: f64 = 0.5;
// Default azimuthal angle of a thetaMode cut
pub const DEFAULT_THETA: f64 = 0.0;

// ===
// Grid bounds and time, file attributes in both Osiris and HiPACE files
// ===
pub const XMIN_ATTR: &str = "XMIN";
pub const XMAX_ATTR: &str = "XMAX";
pub const TIME_ATTR: &str = "TIME";

// ===
// Osiris layout
// ===
pub const OSIRIS_AXIS_GROUP: &str = "AXIS";
pub const OSIRIS_UNITS_ATTR: &str = "UNITS";
pub const OSIRIS_NAME_ATTR: &str = "NAME";
pub const OSIRIS_TIME_UNITS_ATTR: &str = "TIME UNITS";

// ===
// HiPACE layout. HiPACE does not store units, so these are fixed
// ===
pub const HIPACE_FIELD_UNITS: &str = "m_e c \\omega_p e^{-1}";
pub const HIPACE_DENSITY_UNITS: &str = "e \\omega_p^3/ c^3";
pub const HIPACE_LENGTH_UNITS: &str = "c/ \\omega_p";
pub const HIPACE_TIME_UNITS: &str = "1/ \\omega_p";

// ===
// openPMD layout
// ===
pub const OPENPMD_BASE_GROUP: &str = "data";
pub const OPENPMD_DEFAULT_MESHES_PATH: &str = "fields/";
pub const OPENPMD_LENGTH_UNITS: &str = "m";
pub const OPENPMD_TIME_UNITS: &str = "s";
// symbols of the 7 SI base dimensions, in the order of `unitDimension`
pub const SI_BASE_UNITS: [&str; 7] = ["m", "kg", "s", "A", "K", "mol", "cd"];
