use crate::canvas::CanvasController;
use crate::config::CanvasConfig;
use crate::document::PageSettings;
use crate::input::InputHandler;
use crate::panels::{central_panel, tools_panel};
use crate::renderer::Renderer;

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct DiagramApp {
    config: CanvasConfig,
    page: PageSettings,
    /// Path typed into the file field.
    pub(crate) path_input: String,

    #[serde(skip)]
    pub(crate) canvas: CanvasController,
    #[serde(skip)]
    pub(crate) renderer: Renderer,
    #[serde(skip)]
    pub(crate) input: InputHandler,
    /// Buffer of the open text editor.
    #[serde(skip)]
    pub(crate) text_buffer: String,
    #[serde(skip)]
    pub(crate) status: Option<String>,
    /// Page position of the last right-click, where the context menu acts.
    #[serde(skip)]
    pub(crate) context_pos: Option<egui::Pos2>,
}

impl Default for DiagramApp {
    fn default() -> Self {
        Self {
            config: CanvasConfig::default(),
            page: PageSettings::default(),
            path_input: "diagram.svg".to_owned(),
            canvas: CanvasController::default(),
            renderer: Renderer::new(),
            input: InputHandler::new(),
            text_buffer: String::new(),
            status: None,
            context_pos: None,
        }
    }
}

impl DiagramApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        app.canvas = CanvasController::new(app.config.clone());
        app.canvas.restore_page(app.page.clone());
        log::info!("Diagram editor started");
        app
    }

    pub fn canvas(&self) -> &CanvasController {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut CanvasController {
        &mut self.canvas
    }
}

impl eframe::App for DiagramApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.config = self.canvas.config().clone();
        self.page = self.canvas.document().page.clone();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
