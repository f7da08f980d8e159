use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Glimpse Viewer".to_string(),
            width: 512,
            height: 512,
        }
    }
}

impl PlatformConfig {
    pub fn window_attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.width.max(1),
                self.height.max(1),
            ))
    }
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, String> {
    let window = event_loop
        .create_window(config.window_attributes())
        .map_err(|e| format!("Failed to create window '{}': {e}", config.title))?;
    log::info!(
        "Window created: {}x{} '{}'",
        config.width,
        config.height,
        config.title
    );
    Ok(Arc::new(window))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_viewer_window() {
        let config = PlatformConfig::default();
        assert_eq!(config.width, 512);
        assert_eq!(config.height, 512);
        assert!(!config.title.is_empty());
    }

    #[test]
    fn window_attributes_carry_title() {
        let config = PlatformConfig {
            title: "probe".to_string(),
            width: 0,
            height: 300,
        };
        let attrs = config.window_attributes();
        assert_eq!(attrs.title, "probe");
        assert!(attrs.inner_size.is_some());
    }
}
