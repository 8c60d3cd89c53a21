use bolt_schema::Provider;

/// List every provider tag with a short description.
pub fn providers() {
    for provider in Provider::ALL {
        println!(
            "{:<9} {}  {}",
            provider.key(),
            provider.label(),
            provider.launch_path(false)
        );
    }
}
