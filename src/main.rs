/// Headless map viewer for native builds.
///
/// Loads a configuration and a map image, replays a recorded input session
/// through the viewer and logs what an interactive front end would show.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// WASM builds embed the library in a page and have no entry point
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::path::{Path, PathBuf};
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;

    use mapview::{
        AffineTransform, DrawSurface, FrameLoop, InputEvent, LayerPass, MapConfig, MapImage,
        MapViewer, RegionEvent, ScreenPoint, ScreenSize, ViewTransform,
        constants::REGION_POLL_INTERVAL,
    };
    use web_time::Instant;

    /// Simulated time between replayed events
    const FRAME_INTERVAL: Duration = Duration::from_millis(16);

    /// Surface size used until the session resizes it
    const DEFAULT_SCREEN: ScreenSize = ScreenSize {
        width: 1920,
        height: 1080,
    };

    const USAGE: &str = "Usage: mapview-native [--map <image>] [config.json] [session.json]";

    struct Args {
        /// `None` uses the config file in the user config directory
        config: Option<PathBuf>,
        /// Overrides the first map of the config's `Maps` section
        map: Option<PathBuf>,
        session: Option<PathBuf>,
    }

    fn parse_args() -> Option<Args> {
        let mut map = None;
        let mut positional = Vec::new();
        let mut args = std::env::args_os().skip(1);
        while let Some(arg) = args.next() {
            if arg == "--map" {
                map = Some(PathBuf::from(args.next()?));
            } else {
                positional.push(PathBuf::from(arg));
            }
        }

        let mut positional = positional.into_iter();
        let args = Args {
            config: positional.next(),
            map,
            session: positional.next(),
        };
        positional.next().is_none().then_some(args)
    }

    /// Surface that only logs what it is asked to draw.
    #[derive(Default)]
    struct LoggingSurface {
        draws: u64,
    }

    impl DrawSurface for LoggingSurface {
        fn draw_backdrop(&mut self, screen: ScreenSize) {
            self.draws += 1;
            log::trace!("backdrop {}x{}", screen.width, screen.height);
        }

        fn draw_map(&mut self, view: &ViewTransform) {
            self.draws += 1;
            log::trace!("map {:?}", view.forward().coefficients());
        }

        fn draw_layer(&mut self, pass: LayerPass, transform: &AffineTransform) {
            self.draws += 1;
            log::trace!(
                "{:?} alpha {} {:?}",
                pass,
                pass.alpha(),
                transform.coefficients()
            );
        }

        fn draw_measurement(&mut self, path: &[ScreenPoint]) {
            self.draws += 1;
            log::trace!("measurement {:?}", path);
        }
    }

    fn drain_audio(audio: &Receiver<RegionEvent>) {
        for event in audio.try_iter() {
            match event {
                RegionEvent::Enter {
                    name, sound_path, ..
                } => match sound_path {
                    Some(path) => log::info!("Crossfade to '{}' ({})", name, path),
                    None => log::info!("Crossfade to '{}' (no track)", name),
                },
                RegionEvent::Exit => log::info!("Fade out region music"),
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let Some(args) = parse_args() else {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        };

        let config_path = args.config.clone().or_else(MapConfig::default_path);
        let file = match &args.config {
            Some(path) => MapConfig::load_from_path(path)?,
            None => MapConfig::load_from_default_path().unwrap_or_default(),
        };
        let level = file
            .settings
            .as_ref()
            .map(|s| s.log_level)
            .unwrap_or_default();
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(level.to_level_filter().as_str()),
        )
        .init();
        log::info!("Using configuration {:?}", config_path);

        let config = file.resolve()?;
        let map_path = match args.map {
            Some(path) => path,
            None => {
                let config_dir = config_path
                    .as_deref()
                    .and_then(Path::parent)
                    .unwrap_or_else(|| Path::new("."));
                config.map_path(None, config_dir)?
            }
        };
        let map = MapImage::probe(&map_path)?;
        let events = match &args.session {
            Some(path) => InputEvent::parse_session(&std::fs::read_to_string(path)?)?,
            None => Vec::new(),
        };
        log::info!(
            "{} regions, {} session events",
            config.regions.len(),
            events.len()
        );

        let (tx, rx) = mpsc::channel::<RegionEvent>();
        let mut viewer = MapViewer::new(&config, DEFAULT_SCREEN, tx);
        viewer.set_image(map.size);

        // Overlay images live next to the map, in an `overlays` directory
        let overlay_dir = map_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("overlays");
        for (layer, file) in &config.overlay_files {
            match MapImage::probe(overlay_dir.join(file)) {
                Ok(image) => viewer.overlays_mut().set_native_size(*layer, image.size),
                Err(e) => log::warn!("Overlay '{}' unavailable: {}", layer, e),
            }
        }

        let mut surface = LoggingSurface::default();
        let mut frames = FrameLoop::new();
        let mut now = Instant::now();
        frames.tick(&mut viewer, &mut surface, now);
        drain_audio(&rx);

        let mut last_readout = None;
        for event in &events {
            viewer.handle(event);
            now += FRAME_INTERVAL;
            frames.tick(&mut viewer, &mut surface, now);
            drain_audio(&rx);

            let readout = viewer.measurement_readout();
            if readout.is_some() && readout != last_readout {
                log::info!("Measurement: {}", readout.as_deref().unwrap_or_default());
            }
            last_readout = readout;
        }

        // Let the region poll catch up with the final resting position
        now += REGION_POLL_INTERVAL;
        frames.tick(&mut viewer, &mut surface, now);
        drain_audio(&rx);
        frames.stop();

        let (offset_x, offset_y) = viewer.viewport().offset();
        println!(
            "{} frames, {} draw calls, scale {:.3}, offset ({:.1}, {:.1})",
            frames.frame_count(),
            surface.draws,
            viewer.viewport().scale(),
            offset_x,
            offset_y
        );
        match viewer.region_tracker().active_region() {
            Some(region) => println!("Active region: {}", region.name),
            None => println!("Active region: none"),
        }
        Ok(())
    }
}
