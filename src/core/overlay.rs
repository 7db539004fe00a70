use egui::{Color32, RichText};
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::event::WindowEvent;
use winit::window::Window;

use super::backend::{FrameContext, OverlayAction};
use crate::shape::ShapeKind;

/// Unsaved input of the "new shape" form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeDraft {
    pub name: String,
    pub kind: Option<ShapeKind>,
    pub error: Option<String>,
}

impl ShapeDraft {
    /// Validate the form. On success the form is cleared and the create
    /// request returned; otherwise `error` explains what is missing.
    pub fn submit(&mut self) -> Option<OverlayAction> {
        let name = self.name.trim();
        if name.is_empty() {
            self.error = Some("Name is required".to_string());
            return None;
        }
        let Some(kind) = self.kind else {
            self.error = Some("Shape type is required".to_string());
            return None;
        };

        let action = OverlayAction::CreateShape {
            name: name.to_string(),
            shape_type: kind.as_str().to_string(),
        };
        *self = Self::default();
        Some(action)
    }
}

/// egui panel drawn over the 3D view: selection label, shape list and the
/// creation form
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    draft: ShapeDraft,
}

impl Overlay {
    pub fn new(window: &Window, device: &Device, format: TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            ctx,
            state,
            renderer,
            draft: ShapeDraft::default(),
        }
    }

    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run the UI and record its draw calls on top of `view`
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        window: &Window,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        view: &TextureView,
        size_in_pixels: [u32; 2],
        frame: &FrameContext<'_>,
    ) -> Vec<OverlayAction> {
        let mut actions = Vec::new();
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| {
            actions = show_panel(ctx, &mut self.draft, frame);
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: window.scale_factor() as f32,
        };
        self.renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            self.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        actions
    }
}

fn show_panel(ctx: &egui::Context, draft: &mut ShapeDraft, frame: &FrameContext<'_>) -> Vec<OverlayAction> {
    let mut actions = Vec::new();

    egui::Window::new("Shapes")
        .default_pos(egui::pos2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| match frame.highlighted {
                Some(name) => {
                    ui.label(RichText::new(format!("Selected: {name}")).strong());
                    if ui.button("Clear").clicked() {
                        actions.push(OverlayAction::ClearSelection);
                    }
                }
                None => {
                    ui.label(RichText::new("Click a shape to select it").color(Color32::GRAY));
                }
            });
            ui.separator();

            egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                if frame.shapes.is_empty() {
                    ui.label(RichText::new("No shapes yet").color(Color32::GRAY));
                }
                for shape in frame.shapes {
                    ui.horizontal(|ui| {
                        ui.label(format!("{}  {} ({})", shape.id, shape.name, shape.shape_type));
                        if ui.small_button("Delete").clicked() {
                            actions.push(OverlayAction::DeleteShape(shape.id));
                        }
                    });
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut draft.name).hint_text("Name"));
                let selected = draft.kind.map_or("Type", |kind| kind.as_str());
                egui::ComboBox::from_id_salt("new_shape_type")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for kind in ShapeKind::ALL {
                            ui.selectable_value(&mut draft.kind, Some(kind), kind.to_string());
                        }
                    });
                if ui.button("Add").clicked() {
                    actions.extend(draft.submit());
                }
            });
            if let Some(error) = &draft.error {
                ui.colored_label(Color32::LIGHT_RED, error);
            }

            ui.label(
                RichText::new(format!("{:.0} FPS", frame.fps))
                    .size(10.0)
                    .color(Color32::GRAY),
            );
        });

    actions
}
