use std::collections::VecDeque;
use std::fmt;

use foundation::math::{self, GeoError, LatLon, Point, PointScale, Vec3};
use runtime::{EventBus, Frame, FrameClock, Job, Recorded, Scheduler, SubscriptionId};
use tracing::{info, warn};

use crate::attribution::Attributions;
use crate::controls::{Controls, ControlsId, ControlsMotion};
use crate::error::WorldError;
use crate::events::WorldEvent;
use crate::layer::{Layer, LayerEntry, LayerId, LayerStatus};
use crate::options::WorldOptions;
use crate::origin::{Origin, OriginManager};
use crate::view::{MoveKind, ViewOrchestrator};

/// Read-only view of the session handed to frame jobs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameContext {
    pub origin: Option<Origin>,
    /// Position after this frame's controls motion was applied.
    pub position: Option<LatLon>,
}

/// One visualization session.
///
/// Owns the local frame's origin, the move orchestrator, the event stream and
/// everything registered into the session. Hosts drive it by calling
/// [`World::update`] once per animation frame.
pub struct World {
    options: WorldOptions,
    origin: OriginManager,
    view: ViewOrchestrator,
    events: EventBus<WorldEvent>,
    scheduler: Scheduler<FrameContext>,
    clock: FrameClock,
    layers: Vec<LayerEntry>,
    controls: Vec<Box<dyn Controls>>,
    attributions: Attributions,
    running: bool,
    destroyed: bool,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("options", &self.options)
            .field("origin", &self.origin)
            .field("view", &self.view)
            .field("layers", &self.layers)
            .field("controls", &self.controls.len())
            .field("jobs", &self.scheduler.job_count())
            .field("running", &self.running)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldOptions::default())
    }
}

impl World {
    pub fn new(options: WorldOptions) -> Self {
        info!(
            skybox = options.skybox,
            post_processing = options.post_processing,
            event_log_capacity = options.event_log_capacity,
            "init world"
        );
        Self {
            origin: OriginManager::new(),
            view: ViewOrchestrator::new(),
            events: EventBus::with_log_capacity(options.event_log_capacity),
            options,
            scheduler: Scheduler::new(),
            clock: FrameClock::new(),
            layers: Vec::new(),
            controls: Vec::new(),
            attributions: Attributions::default(),
            running: true,
            destroyed: false,
        }
    }

    pub fn options(&self) -> &WorldOptions {
        &self.options
    }

    // ---------------------------------------------------------------------
    // View

    /// Pins the origin to `coord` and resets the view there.
    ///
    /// Only the first call succeeds; later calls return
    /// [`WorldError::OriginAlreadySet`] and emit nothing.
    pub fn set_view(&mut self, coord: LatLon) -> Result<&mut Self, WorldError> {
        let origin = self.origin.set_origin(coord)?;
        let frame = self.clock.current();
        self.view.apply(
            MoveKind::Reset,
            origin.lat_lon,
            Point::ZERO,
            frame,
            &mut self.events,
        );
        Ok(self)
    }

    /// Last position reported through a move notification.
    pub fn position(&self) -> Option<LatLon> {
        self.view.position()
    }

    pub fn origin(&self) -> Option<Origin> {
        self.origin.origin()
    }

    /// A camera gesture finished with its target at `position` (scene space).
    pub fn on_controls_move_end(&mut self, position: Vec3) -> Result<LatLon, WorldError> {
        let frame = self.clock.current();
        self.move_to(MoveKind::Reset, position.ground(), frame)
    }

    /// The camera target moved to `position` mid-gesture.
    pub fn on_controls_move(&mut self, position: Vec3) -> Result<LatLon, WorldError> {
        let frame = self.clock.current();
        self.move_to(MoveKind::Drag, position.ground(), frame)
    }

    fn move_to(
        &mut self,
        kind: MoveKind,
        point: Point,
        frame: Frame,
    ) -> Result<LatLon, WorldError> {
        let lat_lon = self.origin.to_geographic(point)?;
        self.view.apply(kind, lat_lon, point, frame, &mut self.events);
        Ok(lat_lon)
    }

    // ---------------------------------------------------------------------
    // Projection

    /// Raw Mercator forward projection (y north), ignoring the origin.
    pub fn project(&self, coord: LatLon) -> Result<Point, GeoError> {
        math::project(coord)
    }

    pub fn unproject(&self, point: Point) -> Result<LatLon, GeoError> {
        math::try_unproject(point)
    }

    /// Geographic coordinate to a point in the local frame.
    pub fn lat_lon_to_point(&self, coord: LatLon) -> Result<Point, WorldError> {
        self.origin.to_local_point(coord)
    }

    /// Point in the local frame to geographic coordinate.
    pub fn point_to_lat_lon(&self, point: Point) -> Result<LatLon, WorldError> {
        self.origin.to_geographic(point)
    }

    pub fn point_scale(&self, coord: LatLon, accurate: bool) -> Result<PointScale, GeoError> {
        math::point_scale(coord, accurate)
    }

    pub fn metres_to_world(&self, metres: f64, scale: PointScale, zoom: Option<u32>) -> f64 {
        math::metres_to_world(metres, scale, zoom)
    }

    pub fn world_to_metres(&self, world: f64, scale: PointScale, zoom: Option<u32>) -> f64 {
        math::world_to_metres(world, scale, zoom)
    }

    // ---------------------------------------------------------------------
    // Events

    pub fn subscribe(&mut self, listener: impl FnMut(&WorldEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Retained events, oldest first. The log keeps at most
    /// [`WorldOptions::event_log_capacity`] entries; drain it regularly or
    /// subscribe to see every event.
    pub fn events(&self) -> &VecDeque<Recorded<WorldEvent>> {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Recorded<WorldEvent>> {
        self.events.drain()
    }

    // ---------------------------------------------------------------------
    // Frame loop

    /// Advances the world by `dt_s` seconds of host time.
    ///
    /// Returns `None` without doing anything while stopped.
    pub fn update(&mut self, dt_s: f64) -> Option<Frame> {
        if !self.running {
            return None;
        }

        let frame = self.clock.tick(dt_s);
        self.events.emit(frame, WorldEvent::PreUpdate { dt_s: frame.dt_s });

        let motions: Vec<ControlsMotion> = self
            .controls
            .iter_mut()
            .filter_map(|c| c.update(frame.dt_s))
            .collect();
        for motion in motions {
            let (kind, position) = match motion {
                ControlsMotion::Dragging(p) => (MoveKind::Drag, p),
                ControlsMotion::MoveEnd(p) => (MoveKind::Reset, p),
            };
            if let Err(err) = self.move_to(kind, position.ground(), frame) {
                warn!(%err, "dropping controls motion");
            }
        }

        let mut ctx = FrameContext {
            origin: self.origin.origin(),
            position: self.view.position(),
        };
        self.scheduler.run_frame(frame, &mut ctx);
        self.events.emit(frame, WorldEvent::PostUpdate { dt_s: frame.dt_s });
        Some(frame)
    }

    /// Registers work to run on every frame, after controls.
    pub fn add_frame_job(&mut self, job: Job<FrameContext>) {
        self.scheduler.add_job(job);
    }

    pub fn remove_frame_job(&mut self, id: &str) -> usize {
        self.scheduler.remove_job(id)
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn start(&mut self) {
        if !self.destroyed {
            self.running = true;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ---------------------------------------------------------------------
    // Layers

    /// Adds and initialises a layer.
    ///
    /// A layer whose `on_add` fails stays registered with
    /// [`LayerStatus::Failed`] so it can be inspected and removed.
    pub fn add_layer(&mut self, layer: Box<dyn Layer>) -> Result<LayerId, WorldError> {
        if self.destroyed {
            return Err(WorldError::Destroyed);
        }
        let id = layer.id();
        if self.layers.iter().any(|e| e.layer.id() == id) {
            return Err(WorldError::DuplicateLayer(id));
        }

        let mut entry = LayerEntry {
            layer,
            status: LayerStatus::Pending,
        };
        match entry.layer.on_add(&self.origin) {
            Ok(()) => {
                let message = self
                    .options
                    .attribution
                    .as_deref()
                    .or_else(|| entry.layer.attribution());
                if let Some(message) = message {
                    self.attributions.add(id, message);
                }
                entry.status = LayerStatus::Ready;
                self.layers.push(entry);

                info!(?id, "layer added");
                let frame = self.clock.current();
                self.events.emit(frame, WorldEvent::LayerAdded { id });
                Ok(id)
            }
            Err(err) => {
                warn!(?id, %err, "layer failed to initialise");
                entry.status = LayerStatus::Failed(err.to_string());
                self.layers.push(entry);
                Err(WorldError::LayerFailed {
                    id,
                    reason: err.0,
                })
            }
        }
    }

    /// Removes a layer without destroying it and hands it back.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<Box<dyn Layer>, WorldError> {
        let index = self
            .layers
            .iter()
            .position(|e| e.layer.id() == id)
            .ok_or(WorldError::UnknownLayer(id))?;
        let entry = self.layers.remove(index);
        self.attributions.remove(id);

        info!(?id, "layer removed");
        let frame = self.clock.current();
        self.events.emit(frame, WorldEvent::LayerRemoved { id });
        Ok(entry.layer)
    }

    pub fn layer(&self, id: LayerId) -> Option<&dyn Layer> {
        self.layers
            .iter()
            .find(|e| e.layer.id() == id)
            .map(|e| e.layer.as_ref())
    }

    pub fn layer_status(&self, id: LayerId) -> Option<&LayerStatus> {
        self.layers
            .iter()
            .find(|e| e.layer.id() == id)
            .map(|e| &e.status)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn attributions(&self) -> &Attributions {
        &self.attributions
    }

    // ---------------------------------------------------------------------
    // Controls

    pub fn add_controls(
        &mut self,
        mut controls: Box<dyn Controls>,
    ) -> Result<ControlsId, WorldError> {
        if self.destroyed {
            return Err(WorldError::Destroyed);
        }
        let id = controls.id();
        controls.on_add(&self.origin);
        self.controls.push(controls);

        let frame = self.clock.current();
        self.events.emit(frame, WorldEvent::ControlsAdded { id });
        Ok(id)
    }

    /// Removes controls without destroying them and hands them back.
    pub fn remove_controls(&mut self, id: ControlsId) -> Result<Box<dyn Controls>, WorldError> {
        let index = self
            .controls
            .iter()
            .position(|c| c.id() == id)
            .ok_or(WorldError::UnknownControls(id))?;
        let controls = self.controls.remove(index);

        let frame = self.clock.current();
        self.events.emit(frame, WorldEvent::ControlsRemoved { id });
        Ok(controls)
    }

    pub fn controls_count(&self) -> usize {
        self.controls.len()
    }

    // ---------------------------------------------------------------------
    // Teardown

    /// Stops the loop, then removes and destroys every controls and layer.
    ///
    /// The world refuses new layers and controls afterwards.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.stop();

        let controls: Vec<ControlsId> = self.controls.iter().map(|c| c.id()).collect();
        for id in controls {
            if let Ok(mut c) = self.remove_controls(id) {
                c.destroy();
            }
        }

        let layers: Vec<LayerId> = self.layers.iter().map(|e| e.layer.id()).collect();
        for id in layers {
            if let Ok(mut layer) = self.remove_layer(id) {
                layer.destroy();
            }
        }

        self.scheduler = Scheduler::new();
        self.destroyed = true;
        info!("world destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
