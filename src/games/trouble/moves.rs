//! Move options for the race variant.
//!
//! ## Legality
//!
//! For a roll `r` and each of the player's pieces:
//!
//! - `AtHome`: only on a special roll, and only one piece per roll, onto
//!   the start cell unless the player's own piece already stands there
//! - `OnTrack` at progress `p`: `p + r ≤ entry_point` stays on the track;
//!   beyond it the piece turns into the lane at offset
//!   `p + r - entry_point - 1`, which must be `0` when `exact_lane_entry`
//!   is set and may never pass the lane's last cell
//! - `InFinishLane` at offset `o`: `o + r` may not pass the last cell
//! - reaching the last lane cell makes the piece `Done`
//!
//! A piece may not land on another of its owner's pieces with the same
//! status and position (`Done` pieces stack). Landing on an opponent's
//! track piece bumps it home.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::TrackLayout;
use crate::core::{GameState, Piece, PieceStatus, Player, PlayerId, HOME_POSITION};
use crate::rules::EngineEvent;
use crate::triggers::{SpaceEvent, SpaceEventKind};

/// Category of move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// A piece leaves home for the start cell.
    Exit,
    /// A piece already in play moves forward.
    Advance,
}

/// An opponent piece sent home by a move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bump {
    pub owner: PlayerId,
    pub piece: u8,
}

/// One legal move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOption {
    pub piece: u8,
    pub kind: MoveKind,
    pub from_status: PieceStatus,
    pub from: i32,
    pub to_status: PieceStatus,
    pub to: i32,
    pub bumps: Option<Bump>,
}

impl MoveOption {
    /// Where the piece ends up.
    #[must_use]
    pub fn destination(&self) -> (PieceStatus, i32) {
        (self.to_status, self.to)
    }
}

pub type MoveOptions = SmallVec<[MoveOption; 4]>;

/// Legal moves for `state.players[index]` with roll `roll`, exits first,
/// then advances in piece order. Track cells come from the player's seat.
#[must_use]
pub fn compute_move_options(state: &GameState, layout: &TrackLayout, index: usize, roll: u32) -> MoveOptions {
    let mut options = MoveOptions::new();
    let Some(player) = state.players.get(index) else {
        return options;
    };
    if roll == 0 {
        return options;
    }

    if state.settings.is_special(roll) {
        if let Some(option) = exit_option(state, layout, player) {
            options.push(option);
        }
    }

    for piece in &player.pieces {
        if let Some(option) = advance_option(state, layout, player, piece, roll) {
            options.push(option);
        }
    }
    options
}

/// Can a piece leave home? True when one is at home and the start cell is
/// free of the owner's own pieces.
#[must_use]
pub fn can_exit(layout: &TrackLayout, player: &Player) -> bool {
    player.count_pieces(PieceStatus::AtHome) > 0
        && own_piece_on_cell(layout, player, layout.start_index(player.seat)).is_none()
}

fn exit_option(state: &GameState, layout: &TrackLayout, player: &Player) -> Option<MoveOption> {
    if !can_exit(layout, player) {
        return None;
    }
    let piece = player.pieces.iter().find(|p| p.status == PieceStatus::AtHome)?;
    Some(MoveOption {
        piece: piece.index,
        kind: MoveKind::Exit,
        from_status: PieceStatus::AtHome,
        from: HOME_POSITION,
        to_status: PieceStatus::OnTrack,
        to: 0,
        bumps: opponent_on_cell(state, layout, &player.player_id, layout.start_index(player.seat)),
    })
}

fn advance_option(
    state: &GameState,
    layout: &TrackLayout,
    player: &Player,
    piece: &Piece,
    roll: u32,
) -> Option<MoveOption> {
    let last = layout.last_lane_offset();
    let (to_status, to) = match piece.status {
        PieceStatus::AtHome | PieceStatus::Done => return None,
        PieceStatus::OnTrack => {
            let progress = u32::try_from(piece.position).ok()?;
            let projected = progress + roll;
            if projected <= layout.entry_point {
                (PieceStatus::OnTrack, projected)
            } else {
                let offset = projected - layout.entry_point - 1;
                if (layout.exact_lane_entry && offset != 0) || offset > last {
                    return None;
                }
                (lane_status(offset, last), offset)
            }
        }
        PieceStatus::InFinishLane => {
            let offset = u32::try_from(piece.position).ok()? + roll;
            if offset > last {
                return None;
            }
            (lane_status(offset, last), offset)
        }
    };

    let to = i32::try_from(to).ok()?;
    let bumps = match to_status {
        PieceStatus::OnTrack => {
            let cell = layout.absolute_index(player.seat, to as u32);
            if own_piece_on_cell(layout, player, cell).is_some() {
                return None;
            }
            opponent_on_cell(state, layout, &player.player_id, cell)
        }
        PieceStatus::InFinishLane => {
            let blocked = player
                .pieces
                .iter()
                .any(|p| p.index != piece.index && p.status == PieceStatus::InFinishLane && p.position == to);
            if blocked {
                return None;
            }
            None
        }
        _ => None,
    };

    Some(MoveOption {
        piece: piece.index,
        kind: MoveKind::Advance,
        from_status: piece.status,
        from: piece.position,
        to_status,
        to,
        bumps,
    })
}

fn lane_status(offset: u32, last: u32) -> PieceStatus {
    if offset == last {
        PieceStatus::Done
    } else {
        PieceStatus::InFinishLane
    }
}

fn own_piece_on_cell<'a>(layout: &TrackLayout, player: &'a Player, cell: u32) -> Option<&'a Piece> {
    player.pieces.iter().find(|p| {
        p.status == PieceStatus::OnTrack
            && u32::try_from(p.position).is_ok_and(|pos| layout.absolute_index(player.seat, pos) == cell)
    })
}

fn opponent_on_cell(state: &GameState, layout: &TrackLayout, mover: &PlayerId, cell: u32) -> Option<Bump> {
    state
        .players
        .iter()
        .filter(|other| &other.player_id != mover)
        .find_map(|opponent| {
            opponent
                .pieces
                .iter()
                .find(|p| {
                    p.status == PieceStatus::OnTrack
                        && u32::try_from(p.position).is_ok_and(|pos| layout.absolute_index(opponent.seat, pos) == cell)
                })
                .map(|p| Bump {
                    owner: opponent.player_id.clone(),
                    piece: p.index,
                })
        })
}

/// Commit a move: update the piece, send any bumped piece home, and return
/// the events describing it.
pub fn apply_move(state: &mut GameState, index: usize, option: &MoveOption) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    let Some(player) = state.players.get_mut(index) else {
        return events;
    };
    let mover = player.player_id.clone();
    let Some(piece) = player.pieces.iter_mut().find(|p| p.index == option.piece) else {
        return events;
    };
    debug_assert!(piece.status.can_become(option.to_status));
    piece.status = option.to_status;
    piece.position = option.to;
    events.push(EngineEvent::PieceMoved {
        player: mover.clone(),
        piece: option.piece,
        from_status: option.from_status,
        from: option.from,
        to_status: option.to_status,
        to: option.to,
    });

    if let Some(bump) = &option.bumps {
        let bumped = state
            .player_mut(&bump.owner)
            .and_then(|p| p.pieces.iter_mut().find(|piece| piece.index == bump.piece));
        if let Some(piece) = bumped {
            piece.reset();
            events.push(EngineEvent::PieceBumped {
                owner: bump.owner.clone(),
                piece: bump.piece,
                by: mover,
            });
        }
    }
    events
}

/// Board events for a committed move, for tracks with board spaces.
///
/// Only track cells have spaces: the origin is exited if the piece was on
/// the track, every track cell strictly between origin and destination is
/// passed, and the destination is entered if it is on the track.
#[must_use]
pub fn move_space_events(layout: &TrackLayout, seat: usize, player: &PlayerId, option: &MoveOption) -> Vec<SpaceEvent> {
    let mut events = Vec::new();
    if layout.track_spaces.is_empty() {
        return events;
    }
    let space = |progress: u32| layout.space_for(seat, progress).cloned();

    let start = match option.from_status {
        PieceStatus::OnTrack => {
            let from = option.from.max(0) as u32;
            if let Some(id) = space(from) {
                events.push(SpaceEvent::new(SpaceEventKind::Exited, id, player.clone()));
            }
            Some(from)
        }
        _ => None,
    };

    let end_on_track = (option.to_status == PieceStatus::OnTrack).then_some(option.to.max(0) as u32);
    if let Some(from) = start {
        let last_passed = match end_on_track {
            Some(to) => to.saturating_sub(1),
            None => layout.entry_point,
        };
        for progress in (from + 1)..=last_passed {
            if let Some(id) = space(progress) {
                events.push(SpaceEvent::new(SpaceEventKind::Passed, id, player.clone()));
            }
        }
    }

    if let Some(to) = end_on_track {
        if let Some(id) = space(to) {
            events.push(SpaceEvent::new(SpaceEventKind::Entered, id, player.clone()));
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::core::GameSettings;

    fn race(players: usize) -> (GameState, TrackLayout) {
        let layout = TrackLayout::default();
        let mut state = GameState::new(Board::new("race"), GameSettings::default());
        for i in 0..players {
            let id = format!("p{}", i);
            let mut player = Player::new(id.as_str(), id.as_str(), id.as_str());
            player.seat = i;
            player.reset_pieces(layout.pieces_per_player);
            state.players.push(player);
        }
        (state, layout)
    }

    fn place(state: &mut GameState, seat: usize, piece: usize, status: PieceStatus, position: i32) {
        let p = &mut state.players[seat].pieces[piece];
        p.status = status;
        p.position = position;
    }

    #[test]
    fn test_all_home_non_special() {
        let (state, layout) = race(2);
        for roll in 1..=5 {
            assert!(compute_move_options(&state, &layout, 0, roll).is_empty());
        }
    }

    #[test]
    fn test_special_roll_exits_one_piece() {
        let (state, layout) = race(2);
        let options = compute_move_options(&state, &layout, 0, 6);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].kind, MoveKind::Exit);
        assert_eq!(options[0].destination(), (PieceStatus::OnTrack, 0));
    }

    #[test]
    fn test_exit_blocked_by_own_piece() {
        let (mut state, layout) = race(2);
        place(&mut state, 0, 0, PieceStatus::OnTrack, 0);
        let options = compute_move_options(&state, &layout, 0, 6);
        assert!(options.iter().all(|o| o.kind == MoveKind::Advance));
    }

    #[test]
    fn test_land_on_own_piece_illegal() {
        let (mut state, layout) = race(2);
        place(&mut state, 0, 0, PieceStatus::OnTrack, 3);
        place(&mut state, 0, 1, PieceStatus::OnTrack, 5);
        let options = compute_move_options(&state, &layout, 0, 2);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].piece, 1);
    }

    #[test]
    fn test_bump_opponent() {
        let (mut state, layout) = race(2);
        // Seat 1 progress 0 is absolute cell 7.
        place(&mut state, 0, 0, PieceStatus::OnTrack, 4);
        place(&mut state, 1, 2, PieceStatus::OnTrack, 0);

        let options = compute_move_options(&state, &layout, 0, 3);
        assert_eq!(
            options[0].bumps,
            Some(Bump {
                owner: PlayerId::new("p1"),
                piece: 2
            })
        );

        let events = apply_move(&mut state, 0, &options[0]);
        assert_eq!(state.players[1].pieces[2].status, PieceStatus::AtHome);
        assert_eq!(state.players[1].pieces[2].position, HOME_POSITION);
        assert_eq!(state.players[0].pieces[0].position, 7);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_cells_follow_seat_not_index() {
        let (mut state, layout) = race(2);
        // Second in turn order but sitting at seat 3, whose start is cell 21.
        state.players[1].seat = 3;
        place(&mut state, 0, 0, PieceStatus::OnTrack, 16);
        place(&mut state, 1, 0, PieceStatus::OnTrack, 0);

        let options = compute_move_options(&state, &layout, 0, 5);
        assert_eq!(options[0].bumps.as_ref().map(|b| b.owner.as_str()), Some("p1"));

        let options = compute_move_options(&state, &layout, 1, 6);
        assert!(options.iter().all(|o| o.kind == MoveKind::Advance), "own piece holds seat 3's start");
    }

    #[test]
    fn test_exact_lane_entry() {
        let (mut state, _) = race(2);
        let layout = TrackLayout::new().with_track(32, 28).with_seat_spacing(8);
        place(&mut state, 0, 0, PieceStatus::OnTrack, 25);

        let four = compute_move_options(&state, &layout, 0, 4);
        assert_eq!(four.len(), 1);
        assert_eq!(four[0].destination(), (PieceStatus::InFinishLane, 0));

        assert!(compute_move_options(&state, &layout, 0, 5).is_empty());

        let three = compute_move_options(&state, &layout, 0, 3);
        assert_eq!(three[0].destination(), (PieceStatus::OnTrack, 28));
    }

    #[test]
    fn test_loose_lane_entry_still_caps_overshoot() {
        let (mut state, _) = race(2);
        let layout = TrackLayout::new().with_track(32, 28).with_seat_spacing(8).with_loose_lane_entry();
        place(&mut state, 0, 0, PieceStatus::OnTrack, 25);

        let five = compute_move_options(&state, &layout, 0, 5);
        assert_eq!(five[0].destination(), (PieceStatus::InFinishLane, 1));

        let seven = compute_move_options(&state, &layout, 0, 7);
        assert_eq!(seven[0].destination(), (PieceStatus::Done, 3));

        assert!(compute_move_options(&state, &layout, 0, 8).is_empty());
    }

    #[test]
    fn test_lane_moves_and_done() {
        let (mut state, layout) = race(2);
        place(&mut state, 0, 0, PieceStatus::InFinishLane, 1);

        let two = compute_move_options(&state, &layout, 0, 2);
        assert_eq!(two[0].destination(), (PieceStatus::Done, 3));
        assert!(compute_move_options(&state, &layout, 0, 3).is_empty());

        place(&mut state, 0, 1, PieceStatus::InFinishLane, 2);
        assert!(compute_move_options(&state, &layout, 0, 1).iter().all(|o| o.piece != 0));
    }

    #[test]
    fn test_done_pieces_stack() {
        let (mut state, layout) = race(2);
        place(&mut state, 0, 0, PieceStatus::Done, 3);
        place(&mut state, 0, 1, PieceStatus::InFinishLane, 0);
        let options = compute_move_options(&state, &layout, 0, 3);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].to_status, PieceStatus::Done);
    }

    #[test]
    fn test_space_events_follow_track() {
        let layout = TrackLayout::default().with_named_spaces();
        let option = MoveOption {
            piece: 0,
            kind: MoveKind::Advance,
            from_status: PieceStatus::OnTrack,
            from: 2,
            to_status: PieceStatus::OnTrack,
            to: 5,
            bumps: None,
        };
        let events = move_space_events(&layout, 1, &PlayerId::new("p1"), &option);
        let cells: Vec<(SpaceEventKind, &str)> = events.iter().map(|e| (e.kind, e.space.as_str())).collect();
        assert_eq!(
            cells,
            vec![
                (SpaceEventKind::Exited, "track-9"),
                (SpaceEventKind::Passed, "track-10"),
                (SpaceEventKind::Passed, "track-11"),
                (SpaceEventKind::Entered, "track-12"),
            ]
        );
    }

    #[test]
    fn test_exit_enters_start_space() {
        let layout = TrackLayout::default().with_named_spaces();
        let option = MoveOption {
            piece: 0,
            kind: MoveKind::Exit,
            from_status: PieceStatus::AtHome,
            from: HOME_POSITION,
            to_status: PieceStatus::OnTrack,
            to: 0,
            bumps: None,
        };
        let events = move_space_events(&layout, 2, &PlayerId::new("p2"), &option);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].space.as_str(), "track-14");
    }

    #[test]
    fn test_no_space_events_without_board_track() {
        let layout = TrackLayout::default();
        let option = MoveOption {
            piece: 0,
            kind: MoveKind::Exit,
            from_status: PieceStatus::AtHome,
            from: HOME_POSITION,
            to_status: PieceStatus::OnTrack,
            to: 0,
            bumps: None,
        };
        assert!(move_space_events(&layout, 0, &PlayerId::new("p0"), &option).is_empty());
    }
}
