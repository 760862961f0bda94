use tracing_subscriber::fmt::format;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;

/// Custom logger initialization to exclude timestamps but keep colors.
///
/// Use MAQUETTE_LOG=info or MAQUETTE_LOG=debug to increase verbosity.
/// Example: MAQUETTE_LOG=debug cargo run
pub fn init_custom_logger() {
    // Empty time formatter that doesn't print anything
    struct EmptyTime;
    impl FormatTime for EmptyTime {
        fn format_time(
            &self,
            _: &mut tracing_subscriber::fmt::format::Writer<'_>,
        ) -> std::fmt::Result {
            Ok(())
        }
    }

    // Default to warn for minimal noise unless the user overrides
    let default_level =
        std::env::var("MAQUETTE_LOG").unwrap_or_else(|_| "warn".to_string());

    let format = format()
        .with_timer(EmptyTime)
        .with_level(true)
        .with_target(true)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_filter(
                    tracing_subscriber::filter::EnvFilter::from_default_env()
                        .add_directive(default_level.parse().unwrap())
                        // Plan loading messages stay visible at info level
                        .add_directive("maquette::data=info".parse().unwrap())
                        .add_directive(
                            "bevy_winit::system=info".parse().unwrap(),
                        )
                        // Suppress very noisy render layer messages
                        .add_directive("wgpu_core=error".parse().unwrap())
                        .add_directive("wgpu_hal=error".parse().unwrap())
                        .add_directive("bevy_render=error".parse().unwrap()),
                ),
        )
        .init();
}
