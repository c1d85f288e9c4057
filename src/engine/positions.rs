use crate::domain::{SeatIndex, Table};

fn is_ready(table: &Table, idx: usize) -> bool {
    matches!(table.seats.get(idx), Some(Some(p)) if p.is_ready())
}

/// Следующее готовое к игре место по кругу (включая/исключая start).
pub fn next_ready_seat(table: &Table, start: SeatIndex, include_start: bool) -> Option<SeatIndex> {
    let max = table.max_seats();
    if max == 0 {
        return None;
    }

    let mut idx = start as usize % max;
    if !include_start {
        idx = (idx + 1) % max;
    }

    for _ in 0..max {
        if is_ready(table, idx) {
            return Some(idx as SeatIndex);
        }
        idx = (idx + 1) % max;
    }

    None
}

/// Предыдущее готовое место по кругу (исключая start). Если других нет — сам start.
pub fn previous_ready_seat(table: &Table, start: SeatIndex) -> Option<SeatIndex> {
    let max = table.max_seats();
    if max == 0 {
        return None;
    }

    let start = start as usize % max;
    let mut idx = start;
    for _ in 0..max {
        idx = (idx + max - 1) % max;
        if is_ready(table, idx) {
            return Some(idx as SeatIndex);
        }
    }

    None
}

/// Готовые места по кругу, начиная со start.
pub fn collect_ready_seats_from(table: &Table, start: SeatIndex) -> Vec<SeatIndex> {
    let max = table.max_seats();
    let mut seats = Vec::new();
    if max == 0 {
        return seats;
    }

    let mut idx = start as usize % max;
    for _ in 0..max {
        if is_ready(table, idx) {
            seats.push(idx as SeatIndex);
        }
        idx = (idx + 1) % max;
    }

    seats
}

/// Следующая позиция кнопки:
/// - если кнопка уже есть — следующее готовое место;
/// - если нет — первое готовое с нуля.
pub fn next_dealer(table: &Table) -> Option<SeatIndex> {
    match table.dealer_button {
        Some(button) => next_ready_seat(table, button, false),
        None => next_ready_seat(table, 0, true),
    }
}

/// Места блайндов для дилера `dealer`: (small, big).
/// Хедз-ап: дилер ставит small blind.
pub fn blind_seats(table: &Table, dealer: SeatIndex) -> Option<(SeatIndex, SeatIndex)> {
    let order = collect_ready_seats_from(table, dealer);
    match order.len() {
        0 | 1 => None,
        2 => Some((order[0], order[1])),
        _ => Some((order[1], order[2])),
    }
}
