use super::types::{SortEntry, SortOptions, SortResult};
use std::cmp::Ordering;

/// Orders entries by `fixorder` or barycenter. Entries with neither keep their original
/// position `i` and the sorted ones flow around them.
///
/// With `keep_node_order`, entries that carry a `fixorder` are the ones held in place.
pub fn sort(entries: Vec<SortEntry>, opts: SortOptions) -> SortResult {
    let (mut sortable, mut unsortable): (Vec<SortEntry>, Vec<SortEntry>) =
        entries.into_iter().partition(|entry| {
            if opts.keep_node_order {
                entry.fixorder.is_none() && entry.barycenter.is_some()
            } else {
                entry.fixorder.is_some() || entry.barycenter.is_some()
            }
        });

    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| compare(a, b, opts));

    let mut vs: Vec<String> = Vec::new();
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut vs_index = consume_unsortable(&mut vs, &mut unsortable, 0);

    for entry in sortable {
        vs_index += entry.vs.len();
        vs.extend(entry.vs);
        if let (Some(b), Some(w)) = (entry.barycenter, entry.weight) {
            sum += b * w;
            weight += w;
        }
        vs_index = consume_unsortable(&mut vs, &mut unsortable, vs_index);
    }
    // Whatever is left sits past the end of the sorted run.
    while let Some(entry) = unsortable.pop() {
        vs.extend(entry.vs);
    }

    if weight > 0.0 {
        SortResult {
            vs,
            barycenter: Some(sum / weight),
            weight: Some(weight),
        }
    } else {
        SortResult {
            vs,
            barycenter: None,
            weight: None,
        }
    }
}

fn consume_unsortable(vs: &mut Vec<String>, unsortable: &mut Vec<SortEntry>, mut index: usize) -> usize {
    loop {
        match unsortable.last() {
            Some(last) if last.i <= index => {}
            _ => return index,
        }
        let Some(last) = unsortable.pop() else {
            return index;
        };
        vs.extend(last.vs);
        index += 1;
    }
}

fn compare(a: &SortEntry, b: &SortEntry, opts: SortOptions) -> Ordering {
    let key = |e: &SortEntry| e.fixorder.map(|f| f as f64).or(e.barycenter);
    let primary = match (key(a), key(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    primary
        .then_with(|| {
            if opts.use_prev {
                a.order.cmp(&b.order)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| {
            if opts.bias_right {
                b.i.cmp(&a.i)
            } else {
                a.i.cmp(&b.i)
            }
        })
}
