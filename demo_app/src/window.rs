//! GLFW window the renderer presents into

use remix_bridge::NativeWindow;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Failed to initialize GLFW")]
    InitializationFailed,
    #[error("Failed to create window")]
    CreationFailed,
}

pub type WindowResult<T> = Result<T, WindowError>;

/// GLFW window without a client API; the renderer owns the swapchain
pub struct Window {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors).map_err(|_| WindowError::InitializationFailed)?;

        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed)?;

        window.set_key_polling(true);
        window.set_close_polling(true);

        Ok(Self { glfw, window, events })
    }

    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Poll and handle events; Escape closes the window
    pub fn poll_events(&mut self) {
        self.glfw.poll_events();
        for (_, event) in glfw::flush_messages(&self.events) {
            if let glfw::WindowEvent::Key(glfw::Key::Escape, _, glfw::Action::Press, _) = event {
                self.window.set_should_close(true);
            }
        }
    }

    pub fn aspect(&self) -> f32 {
        let (width, height) = self.window.get_framebuffer_size();
        if height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        }
    }

    /// Native handle for the renderer; null when the platform has no HWND
    pub fn native(&self) -> NativeWindow {
        NativeWindow::from_window(&*self.window).unwrap_or_else(|e| {
            log::warn!("{e}; starting without a window");
            NativeWindow::null()
        })
    }
}
