use crate::db::core::ChannelDB;
use crate::db::route::Routing;
use rayon::prelude::*;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn run(db: &ChannelDB, routing: &Routing) -> Result<(), String> {
    log::info!("Starting channel verification...");

    let assignment = &routing.assignment;
    let n = db.num_segments();

    if assignment.by_segment.len() != n {
        return Err(format!(
            "assignment covers {} segments, database has {}",
            assignment.by_segment.len(),
            n
        ));
    }

    let mut seen = vec![false; n];
    for (track, segs) in assignment.tracks.iter().enumerate() {
        for &sid in segs {
            if assignment.by_segment[sid.index()] as usize != track {
                return Err(format!(
                    "segment {:?} listed on track {} but assigned track {}",
                    sid,
                    track,
                    assignment.by_segment[sid.index()]
                ));
            }
            if seen[sid.index()] {
                return Err(format!("segment {:?} placed more than once", sid));
            }
            seen[sid.index()] = true;
        }
    }
    if let Some(missing) = seen.iter().position(|&s| !s) {
        return Err(format!("segment {} missing from every track", missing));
    }

    let rows = 2 * assignment.track_count() + 1;
    if routing.grid.len() != rows || routing.grid.iter().any(|r| r.len() != db.columns) {
        return Err(format!(
            "grid is {}x{}, expected {}x{}",
            routing.grid.len(),
            routing.grid.first().map_or(0, |r| r.len()),
            rows,
            db.columns
        ));
    }

    let error_found = AtomicBool::new(false);
    let error_msg = Mutex::new(String::new());

    // No two different nets may overlap on one track.
    assignment.tracks.par_iter().enumerate().for_each(|(track, segs)| {
        if error_found.load(Ordering::Relaxed) {
            return;
        }
        for i in 0..segs.len() {
            for j in (i + 1)..segs.len() {
                let a = db.segment(segs[i]);
                let b = db.segment(segs[j]);
                if a.net != b.net && a.span().overlaps(&b.span()) {
                    let msg = format!(
                        "SHORT: nets {} and {} overlap on track {}",
                        db.net_label(segs[i]),
                        db.net_label(segs[j]),
                        track
                    );
                    log::error!("FAIL: {}", msg);
                    if !error_found.swap(true, Ordering::Relaxed) {
                        *error_msg.lock().unwrap() = msg;
                    }
                    return;
                }
            }
        }
    });

    // Each net's segments, ordered by column, must chain end to end.
    db.nets.par_iter().for_each(|net| {
        if error_found.load(Ordering::Relaxed) {
            return;
        }

        for &sid in &net.segments {
            let seg = db.segment(sid);
            if seg.left.column > seg.right.column {
                let msg = format!("net {}: segment with inverted span", net.label);
                log::error!("FAIL: {}", msg);
                if !error_found.swap(true, Ordering::Relaxed) {
                    *error_msg.lock().unwrap() = msg;
                }
                return;
            }
        }

        let mut ordered = net.segments.clone();
        ordered.sort_by_key(|&sid| {
            let seg = db.segment(sid);
            (seg.left.column, seg.right.column)
        });
        for w in ordered.windows(2) {
            let prev = db.segment(w[0]);
            let next = db.segment(w[1]);
            if next.left.column != prev.right.column || next.left.side != prev.right.side {
                let msg = format!(
                    "OPEN: net {} breaks between columns {} and {}",
                    net.label, prev.right.column, next.left.column
                );
                log::error!("FAIL: {}", msg);
                if !error_found.swap(true, Ordering::Relaxed) {
                    *error_msg.lock().unwrap() = msg;
                }
                return;
            }
        }
    });

    if error_found.load(Ordering::Relaxed) {
        Err(error_msg.lock().unwrap().clone())
    } else {
        log::info!("\x1b[32mPASS\x1b[0m: channel layout is valid.");
        Ok(())
    }
}
