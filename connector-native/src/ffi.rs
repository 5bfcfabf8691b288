//! C surface of `librtiddsconnector`.

#![allow(non_snake_case)]
#![allow(non_camel_case_types)]

use libc::{c_char, c_double, c_int, c_void};

/// Opaque `RTI_Connector`.
#[repr(C)]
pub struct RTI_Connector {
    _private: [u8; 0],
}

#[repr(C)]
pub struct RTI_Connector_Options {
    pub enable_on_data_event: c_int,
    pub one_based_sequence_indexing: c_int,
}

unsafe extern "C" {
    pub fn RTI_Connector_new(
        config_name: *const c_char,
        config_file: *const c_char,
        options: *const RTI_Connector_Options,
    ) -> *mut RTI_Connector;

    pub fn RTI_Connector_delete(connector: *mut RTI_Connector);

    pub fn RTI_Connector_get_datawriter(
        connector: *mut RTI_Connector,
        entity_name: *const c_char,
        writer: *mut *mut c_void,
    ) -> c_int;

    pub fn RTI_Connector_get_datareader(
        connector: *mut RTI_Connector,
        entity_name: *const c_char,
        reader: *mut *mut c_void,
    ) -> c_int;

    pub fn RTI_Connector_set_number_into_samples(
        connector: *mut RTI_Connector,
        entity_name: *const c_char,
        name: *const c_char,
        value: c_double,
    ) -> c_int;

    pub fn RTI_Connector_set_boolean_into_samples(
        connector: *mut RTI_Connector,
        entity_name: *const c_char,
        name: *const c_char,
        value: c_int,
    ) -> c_int;

    pub fn RTI_Connector_set_string_into_samples(
        connector: *mut RTI_Connector,
        entity_name: *const c_char,
        name: *const c_char,
        value: *const c_char,
    ) -> c_int;

    pub fn RTI_Connector_set_json_instance(
        connector: *mut RTI_Connector,
        entity_name: *const c_char,
        json: *const c_char,
    ) -> c_int;

    pub fn RTI_Connector_clear(connector: *mut RTI_Connector, entity_name: *const c_char)
    -> c_int;

    pub fn RTI_Connector_write(
        connector: *mut RTI_Connector,
        entity_name: *const c_char,
        params_json: *const c_char,
    ) -> c_int;

    pub fn RTI_Connector_read(connector: *mut RTI_Connector, entity_name: *const c_char)
    -> c_int;

    pub fn RTI_Connector_take(connector: *mut RTI_Connector, entity_name: *const c_char)
    -> c_int;

    pub fn RTI_Connector_get_sample_count(
        connector: *mut RTI_Connector,
        entity_name: *const c_char,
        value: *mut c_double,
    ) -> c_int;

    pub fn RTI_Connector_get_number_from_sample(
        connector: *mut RTI_Connector,
        value: *mut c_double,
        entity_name: *const c_char,
        index: c_int,
        name: *const c_char,
    ) -> c_int;

    pub fn RTI_Connector_get_boolean_from_sample(
        connector: *mut RTI_Connector,
        value: *mut c_int,
        entity_name: *const c_char,
        index: c_int,
        name: *const c_char,
    ) -> c_int;

    pub fn RTI_Connector_get_string_from_sample(
        connector: *mut RTI_Connector,
        value: *mut *mut c_char,
        entity_name: *const c_char,
        index: c_int,
        name: *const c_char,
    ) -> c_int;

    pub fn RTI_Connector_get_json_sample(
        connector: *mut RTI_Connector,
        entity_name: *const c_char,
        index: c_int,
        json: *mut *mut c_char,
    ) -> c_int;

    pub fn RTI_Connector_get_boolean_from_infos(
        connector: *mut RTI_Connector,
        value: *mut c_int,
        entity_name: *const c_char,
        index: c_int,
        name: *const c_char,
    ) -> c_int;

    pub fn RTI_Connector_wait_for_data(connector: *mut RTI_Connector, timeout: c_int) -> c_int;

    pub fn RTI_Connector_wait_for_data_on_reader(reader: *mut c_void, timeout: c_int) -> c_int;

    pub fn RTI_Connector_get_last_error_message() -> *mut c_char;

    pub fn RTI_Connector_free_string(s: *mut c_char);
}
