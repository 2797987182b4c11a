//! UI element and callback identifiers
//!
//! Element ids name visual elements in the host's form assets; callback ids
//! are the handler keys the plugin registers against the transport at
//! startup. Both sides of the contract live here so the services and the
//! callback registry cannot drift apart.

/// The committed-ID display element
pub const ID_VIEW: &str = "DNI";

/// The registration form element
pub const REGISTER_FORM: &str = "DNI-FORM";

/// Title label on the registration form
pub const REGISTER_TITLE_LABEL: &str = "LABEL-TITLE-ID-REGISTER";

/// Close button on the registration form
pub const REGISTER_CLOSE_BUTTON: &str = "BUTTON-CLOSE-REGISTER";

/// Submit button on the registration form
pub const REGISTER_SUBMIT_BUTTON: &str = "BUTTON-SUBMIT-REGISTER";

/// Close button on the ID view
pub const ID_CLOSE_BUTTON: &str = "CLOSE-DNI";

// Registration form input fields.
pub const FIELD_FIRST_NAME: &str = "FIELD-FN-REGISTER";
pub const FIELD_LAST_NAME: &str = "FIELD-LN-REGISTER";
pub const FIELD_DATE_OF_BIRTH: &str = "FIELD-DOB-REGISTER";
pub const FIELD_ADDRESS: &str = "FIELD-ADDRESS-REGISTER";
pub const FIELD_HEIGHT: &str = "FIELD-HGT-REGISTER";
pub const FIELD_WEIGHT: &str = "FIELD-WGT-REGISTER";
pub const SEX_DROPDOWN: &str = "DROPDOWN-SEX-REGISTER";

/// The six text fields on the registration form, in request order
pub const REGISTER_TEXT_FIELDS: [&str; 6] = [
    FIELD_FIRST_NAME,
    FIELD_LAST_NAME,
    FIELD_DATE_OF_BIRTH,
    FIELD_ADDRESS,
    FIELD_HEIGHT,
    FIELD_WEIGHT,
];

// Labels on the ID view.
pub const VIEW_TITLE_LABEL: &str = "LABEL-TITLE";
pub const VIEW_ID: &str = "ID";
pub const VIEW_FIRST_NAME: &str = "FN";
pub const VIEW_LAST_NAME: &str = "LN";
pub const VIEW_DATE_OF_BIRTH: &str = "DOB";
pub const VIEW_ADDRESS: &str = "ADDRESS";
pub const VIEW_SEX: &str = "SEX";
pub const VIEW_HEIGHT: &str = "HGT";
pub const VIEW_WEIGHT: &str = "WGT";

/// Callback ids registered against the UI transport
pub mod callbacks {
    /// NPC interaction that opens the registration form
    pub const REGISTER_OPEN: &str = "register.open";
    /// Registration form close button
    pub const REGISTER_CLOSE: &str = "register.close";
    /// Registration form submit button
    pub const REGISTER_SUBMIT: &str = "register.submit";
    /// Text field value delivery
    pub const REGISTER_FIELD: &str = "register.field";
    /// Sex dropdown value delivery
    pub const REGISTER_SEX: &str = "register.sex";
    /// ID view close button
    pub const ID_CLOSE: &str = "id.close";
}
