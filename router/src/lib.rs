pub mod constraints;
pub mod cycles;
pub mod renderer;
pub mod scheduler;

use channel_common::db::core::ChannelDB;
use channel_common::db::route::Routing;
use channel_common::error::RouteError;
use channel_common::util::profiler::ScopedTimer;

/// Routes the channel: resolves vertical constraint cycles with doglegs,
/// schedules every segment onto a track, and draws the symbolic grid.
///
/// The database is mutated only by dogleg splits; the assignment itself is
/// returned, never written back. On failure nothing is returned at all.
pub fn route(db: &mut ChannelDB) -> Result<Routing, RouteError> {
    let _timer = ScopedTimer::new("channel routing");

    let vcg = loop {
        let vcg = constraints::vertical_constraints(db);
        match cycles::find_cycle(&vcg) {
            Some(cycle) if cycle.len() > 1 => {
                log::info!("VCG cycle through {} segments, breaking with a dogleg", cycle.len());
                if !cycles::break_cycle(db, &cycle) {
                    log::warn!("No free contact inside any cycle segment; channel is unroutable");
                    return Err(RouteError::UnresolvableCycle);
                }
            }
            _ => break vcg,
        }
    };

    let hcg = constraints::horizontal_constraints(db);
    let assignment = scheduler::assign_tracks(db, &vcg, &hcg)?;
    log::info!(
        "Scheduled {} segments onto {} tracks",
        db.num_segments(),
        assignment.track_count()
    );

    let grid = renderer::render(db, &assignment);
    Ok(Routing { assignment, grid })
}
