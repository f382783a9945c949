use std::time::Instant;

use eframe::egui;
use tracing::{error, info, trace};

use fractus_app::{
    Explorer, ExplorerOptions, FileFragmentStore, FrameSurface, InputEvent, Key, Outcome,
    PointerButton,
};
use fractus_core::SurfaceSize;
use fractus_render::CpuKernel;

/// Pixels per wheel "line" when the platform reports lines.
const WHEEL_LINE_PX: f32 = 40.0;

type DesktopExplorer = Explorer<CpuKernel, FrameSurface, FileFragmentStore>;

pub(crate) struct ExplorerApp {
    options: ExplorerOptions,
    /// Created on the first frame, once the canvas size is known.
    explorer: Option<DesktopExplorer>,
    surface_size: Option<SurfaceSize>,
    texture: Option<egui::TextureHandle>,
    uploaded_revision: u64,
    title: String,
}

impl ExplorerApp {
    pub(crate) fn new(options: ExplorerOptions) -> Self {
        Self {
            options,
            explorer: None,
            surface_size: None,
            texture: None,
            uploaded_revision: 0,
            title: String::new(),
        }
    }

    fn explorer_for(&mut self, size: SurfaceSize) -> &mut DesktopExplorer {
        let options = self.options;
        self.explorer.get_or_insert_with(|| {
            let store = FileFragmentStore::default_location();
            info!("Saved view lives at {}", store.path().display());
            let mut explorer = Explorer::new(
                CpuKernel::default(),
                FrameSurface::new(),
                store,
                size,
                options,
            );
            if let Err(e) = explorer.start() {
                error!("First frame failed: {e}");
            }
            explorer
        })
    }

    fn dispatch(&mut self, event: InputEvent, now: Instant) {
        let Some(explorer) = self.explorer.as_mut() else {
            return;
        };
        match explorer.handle(event, now) {
            Ok(Outcome::ResetRequested) => {
                if confirm_reset_dialog() {
                    explorer.confirm_reset(now);
                }
            }
            Ok(_) => {}
            Err(e) => error!("Frame failed: {e}"),
        }
    }

    fn upload(&mut self, ctx: &egui::Context) {
        let Some(explorer) = self.explorer.as_ref() else {
            return;
        };
        let surface = explorer.surface();
        if surface.revision() == self.uploaded_revision {
            return;
        }
        if let Some(frame) = surface.frame() {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [frame.width as usize, frame.height as usize],
                &frame.pixels,
            );
            self.texture = Some(ctx.load_texture("fractal", image, egui::TextureOptions::LINEAR));
        }
        self.uploaded_revision = surface.revision();
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let Some(explorer) = self.explorer.as_ref() else {
            return;
        };
        let title = format!("Fractus #{}", explorer.fragment());
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;

                match surface_size(rect, ctx.pixels_per_point()) {
                    Ok(size) => {
                        let first = self.explorer.is_none();
                        self.explorer_for(size);
                        if !first && self.surface_size != Some(size) {
                            self.dispatch(InputEvent::Resize(size), now);
                        }
                        self.surface_size = Some(size);
                    }
                    Err(e) => trace!("Ignoring canvas size: {e}"),
                }

                let (events, pointer) = ctx.input(|i| (i.events.clone(), i.pointer.latest_pos()));
                for event in &events {
                    for input in translate(event, rect, pointer) {
                        self.dispatch(input, now);
                    }
                }

                if let Some(explorer) = self.explorer.as_mut() {
                    if let Err(e) = explorer.tick(now) {
                        error!("Frame failed: {e}");
                    }
                }

                self.upload(ctx);
                if let Some(ref tex) = self.texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    painter.image(tex.id(), rect, uv, egui::Color32::WHITE);
                }
            });

        self.sync_title(ctx);
        if let Some(deadline) = self.explorer.as_ref().and_then(|e| e.next_deadline()) {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}

fn surface_size(rect: egui::Rect, pixels_per_point: f32) -> fractus_app::Result<SurfaceSize> {
    Ok(SurfaceSize::new(
        rect.width() as f64,
        rect.height() as f64,
        pixels_per_point as f64,
    )?)
}

fn confirm_reset_dialog() -> bool {
    rfd::MessageDialog::new()
        .set_title("Fractus")
        .set_description("Reset?")
        .set_buttons(rfd::MessageButtons::YesNo)
        .show()
        == rfd::MessageDialogResult::Yes
}

/// Map one egui event onto controller input, relative to the canvas `rect`.
/// Wheel events carry no position, so they use the last known `pointer`.
fn translate(
    event: &egui::Event,
    rect: egui::Rect,
    pointer: Option<egui::Pos2>,
) -> Vec<InputEvent> {
    let local = |pos: egui::Pos2| ((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
    match event {
        egui::Event::PointerButton {
            pos,
            button,
            pressed,
            ..
        } => {
            let (x, y) = local(*pos);
            let button = map_button(*button);
            if *pressed && rect.contains(*pos) {
                vec![InputEvent::PointerDown { button, x, y }]
            } else if !*pressed {
                vec![InputEvent::PointerUp { button, x, y }]
            } else {
                Vec::new()
            }
        }
        egui::Event::PointerMoved(pos) => {
            let (x, y) = local(*pos);
            vec![InputEvent::PointerMove { x, y }]
        }
        egui::Event::MouseWheel { unit, delta, .. } => {
            let per_unit = match unit {
                egui::MouseWheelUnit::Point => 1.0,
                egui::MouseWheelUnit::Line => WHEEL_LINE_PX,
                egui::MouseWheelUnit::Page => rect.height(),
            };
            let Some((x, y)) = pointer.filter(|p| rect.contains(*p)).map(local) else {
                return Vec::new();
            };
            // egui reports scrolling up as positive.
            vec![InputEvent::Wheel {
                x,
                y,
                delta_y: -(delta.y * per_unit) as f64,
            }]
        }
        egui::Event::Key {
            key: egui::Key::Backspace,
            pressed: true,
            ..
        } => vec![InputEvent::Key(Key::Backspace)],
        egui::Event::Text(text) => text
            .chars()
            .map(|c| InputEvent::Key(Key::Character(c)))
            .collect(),
        _ => Vec::new(),
    }
}

fn map_button(button: egui::PointerButton) -> PointerButton {
    match button {
        egui::PointerButton::Primary => PointerButton::Primary,
        egui::PointerButton::Secondary => PointerButton::Secondary,
        egui::PointerButton::Middle => PointerButton::Middle,
        _ => PointerButton::Other,
    }
}
