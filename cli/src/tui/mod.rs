pub mod app;
pub mod ui;

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use meterdash_core::{
    fetch_guarded, open_source, DashboardSession, DataSource, DatasetSource, FetchFailure, MeterDataset, RefreshSchedule, Settings,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::tui::app::App;

type FetchResult = Result<MeterDataset, FetchFailure>;

const MAX_POLL: Duration = Duration::from_millis(250);

struct Refresher {
    data_source: DataSource<dyn DatasetSource>,
    schedule: RefreshSchedule,
    tx: Sender<FetchResult>,
    rx: Receiver<FetchResult>,
}

impl Refresher {
    fn new(settings: &Settings) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            data_source: DataSource::from_shared(open_source(&settings.data_location)),
            schedule: RefreshSchedule::from_millis(settings.refresh_interval_ms),
            tx,
            rx,
        }
    }

    fn tick(&mut self, now: Instant) {
        if self.schedule.is_due(now) {
            self.schedule.mark_fired(now);
            self.start_fetch();
        }
    }

    /// Runs the fetch on a worker thread; skipped while one is outstanding.
    fn start_fetch(&mut self) {
        if !self.data_source.begin_fetch() {
            return;
        }
        tracing::debug!(location = self.data_source.location(), "fetching meter data");
        let source = self.data_source.shared_source();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let _ = tx.send(fetch_guarded(source.as_ref()));
        });
    }

    /// How long the event loop may block before the next tick is due.
    fn poll_timeout(&self, now: Instant) -> Duration {
        self.schedule.time_until_due(now).min(MAX_POLL)
    }

    fn drain(&mut self, session: &mut DashboardSession<App>) {
        while let Ok(result) = self.rx.try_recv() {
            self.data_source.finish(&result);
            session.apply(result);
        }
        session.sink_mut().fetch_state = self.data_source.state();
    }
}

pub fn run(settings: Settings) -> Result<()> {
    let app = App::new(settings.data_location.clone(), settings.unit.clone());
    let mut refresher = Refresher::new(&settings);
    let mut session = DashboardSession::new(app, settings);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut session, &mut refresher);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut DashboardSession<App>,
    refresher: &mut Refresher,
) -> io::Result<()> {
    loop {
        refresher.tick(Instant::now());
        refresher.drain(session);

        terminal.draw(|f| ui::draw(f, session.sink_mut()))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if event::poll(refresher.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('r') => refresher.start_fetch(),
                    KeyCode::Down | KeyCode::Char('j') => session.sink_mut().next(),
                    KeyCode::Up | KeyCode::Char('k') => session.sink_mut().previous(),
                    _ => {}
                }
            }
        }
    }
}
