use std::thread;

use planet_scene::assets::AssetSlot;

#[cfg(test)]
mod asset_slot_tests {
    use super::*;

    #[test]
    fn test_slot_starts_empty() {
        let slot: AssetSlot<u32> = AssetSlot::new("galaxy");
        assert!(!slot.is_filled());
        assert_eq!(slot.get(), None);
        assert_eq!(slot.name(), "galaxy");
    }

    #[test]
    fn test_second_fill_keeps_first_value() {
        let slot = AssetSlot::new("galaxy");
        assert_eq!(slot.fill(1), Ok(()));
        assert_eq!(slot.fill(2), Err(2));
        assert_eq!(slot.get(), Some(&1));
    }

    #[test]
    fn test_clones_share_the_cell() {
        let slot = AssetSlot::new("moon");
        let reader = slot.clone();
        assert!(slot.same_slot(&reader));
        assert!(!slot.same_slot(&AssetSlot::new("moon")));

        let writer = slot.clone();
        thread::spawn(move || writer.fill("loaded".to_string()))
            .join()
            .unwrap()
            .unwrap();

        assert_eq!(reader.get().map(String::as_str), Some("loaded"));
    }

    #[test]
    fn test_racing_writers_fill_once() {
        let slot = AssetSlot::new("race");
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let slot = slot.clone();
                thread::spawn(move || slot.fill(i).is_ok())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert!(slot.is_filled());
    }
}
