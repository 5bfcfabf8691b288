fn main() {
    connector_build::connector_env_var_changed();
    connector_build::link_connector_lib();
}
