//! End-to-end editing scenarios spanning several modules.

#[cfg(test)]
mod placement_scenarios {
    use crate::core::session::EditorSession;
    use crate::editing::commands::EditCommand;
    use crate::editing::entity::{ArchKind, ArchObject, PlanModel};
    use crate::geometry::PlanPoint;
    use crate::tools::place::{PlacementOutcome, PlacementState};
    use crate::tools::PlacementKind;

    #[test]
    fn placed_glazing_reaches_the_model_and_undoes() {
        let mut session = EditorSession::new(PlanModel::new());
        let mut placement = PlacementState::default();
        placement.activate(PlacementKind::Glazing);

        assert!(placement.handle_point(PlanPoint::new(0.0, 0.0, 0.0)).is_none());
        let outcome = placement
            .handle_point(PlanPoint::new(4.0, 0.0, 0.0))
            .expect("second point should complete a two-point placement");

        let PlacementOutcome::Arch { kind, shape } = outcome else {
            panic!("glazing placement should produce an architectural object");
        };
        assert_eq!(kind, ArchKind::Glazing);
        assert_eq!(shape.length(), 4.0);
        assert_eq!(shape.angle(), 0.0);

        let id = session.model.allocate_arch_id();
        session.execute(EditCommand::PlaceArch {
            object: ArchObject::new(id, kind, 0, shape),
        });
        assert_eq!(session.model.arch_objects().count(), 1);

        session.undo();
        assert_eq!(
            session.model.arch_objects().count(),
            0,
            "undo should remove the placed object"
        );
        session.redo();
        assert_eq!(session.model.arch_objects().count(), 1);
    }

    #[test]
    fn spawn_point_placement_replaces_previous_marker() {
        let mut session = EditorSession::new(PlanModel::new());
        let mut placement = PlacementState::default();
        placement.activate(PlacementKind::SpawnPoint);

        let first = placement
            .handle_point(PlanPoint::new(1.0, 0.0, 1.0))
            .expect("spawn point completes on the first click");
        let PlacementOutcome::SpawnPoint(point) = first else {
            panic!("spawn placement should produce a spawn point");
        };
        session.execute(EditCommand::SetSpawnPoint {
            before: session.model.spawn_point,
            after: point,
        });

        let second = placement
            .handle_point(PlanPoint::new(5.0, 0.0, 2.0))
            .expect("spawn tool stays active for repeated placement");
        let PlacementOutcome::SpawnPoint(point) = second else {
            panic!("spawn placement should produce a spawn point");
        };
        session.execute(EditCommand::SetSpawnPoint {
            before: session.model.spawn_point,
            after: point,
        });

        assert_eq!(session.model.spawn_point, Some(PlanPoint::new(5.0, 0.0, 2.0)));
        session.undo();
        assert_eq!(
            session.model.spawn_point,
            Some(PlanPoint::new(1.0, 0.0, 1.0)),
            "undo should restore the previous spawn point"
        );
    }
}

#[cfg(test)]
mod drag_scenarios {
    use bevy::math::Vec3;

    use crate::core::io::input::ModifierState;
    use crate::core::session::EditorSession;
    use crate::editing::entity::{EntityKey, Fixture, PlanModel};
    use crate::editing::transform::TransformSession;
    use crate::geometry::PlanPoint;

    fn session_with_row(count: u32) -> (EditorSession, Vec<EntityKey>) {
        let mut model = PlanModel::new();
        let mut keys = Vec::new();
        for i in 0..count {
            let fixture = Fixture::new(
                0,
                "shelf",
                i,
                PlanPoint::new(i as f32 * 2.0, 0.0, 0.0),
                "acme",
            );
            keys.push(EntityKey::Fixture(fixture.key()));
            model.insert_fixture(fixture);
        }
        (EditorSession::new(model), keys)
    }

    fn select(session: &mut EditorSession, keys: &[EntityKey]) {
        let shift = ModifierState {
            shift: true,
            ..Default::default()
        };
        for key in keys {
            session.selection.toggle(key.clone(), &shift);
        }
    }

    #[test]
    fn group_drag_commits_one_undoable_move() {
        let (mut session, keys) = session_with_row(3);
        select(&mut session, &keys);

        let mut transform = TransformSession::default();
        assert!(transform.begin(&session.selection, &session.model));
        // Centroid is (2,0,0); drag 3 units along render x.
        transform.update(Vec3::new(5.0, 0.0, 0.0));
        let command = transform.release().expect("drag with delta commits");
        session.execute(command);
        transform.finish();

        for (i, key) in keys.iter().enumerate() {
            assert_eq!(
                session.model.position_of(key).unwrap(),
                PlanPoint::new(i as f32 * 2.0 + 3.0, 0.0, 0.0),
                "spacing must survive the group drag"
            );
        }

        // The whole group move is a single history entry.
        assert!(session.undo());
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(
                session.model.position_of(key).unwrap(),
                PlanPoint::new(i as f32 * 2.0, 0.0, 0.0)
            );
        }
        assert!(!session.history.can_undo());
    }

    #[test]
    fn consecutive_drags_follow_the_moved_centroid() {
        let (mut session, keys) = session_with_row(2);
        select(&mut session, &keys);

        let mut transform = TransformSession::default();
        transform.begin(&session.selection, &session.model);
        transform.update(Vec3::new(2.0, 0.0, 0.0)); // centroid (1,0,0) -> +1
        session.execute(transform.release().unwrap());
        transform.finish();

        // The second drag starts from the new positions.
        transform.begin(&session.selection, &session.model);
        transform.update(Vec3::new(3.0, 0.0, 0.0)); // centroid (2,0,0) -> +1
        session.execute(transform.release().unwrap());
        transform.finish();

        assert_eq!(
            session.model.position_of(&keys[0]).unwrap(),
            PlanPoint::new(2.0, 0.0, 0.0)
        );
        assert_eq!(
            session.model.position_of(&keys[1]).unwrap(),
            PlanPoint::new(4.0, 0.0, 0.0)
        );
    }

    #[test]
    fn deep_histories_forget_the_oldest_edit() {
        let (mut session, keys) = session_with_row(1);
        let key = keys[0].clone();
        for step in 1..=25 {
            session.set_position(key.clone(), PlanPoint::new(step as f32, 0.0, 0.0));
        }

        let mut undone = 0;
        while session.undo() {
            undone += 1;
        }
        assert_eq!(undone, 20, "history keeps at most twenty edits");
        // The five evicted edits are permanent.
        assert_eq!(
            session.model.position_of(&key).unwrap(),
            PlanPoint::new(5.0, 0.0, 0.0)
        );
    }
}

#[cfg(test)]
mod measure_scenarios {
    use crate::tools::measure::MeasureState;
    use crate::geometry::PlanPoint;

    #[test]
    fn measurement_reports_distance_without_any_command() {
        let mut measure = MeasureState::default();
        measure.handle_point(PlanPoint::new(0.0, 0.0, 0.0));
        assert!(measure.distance().is_none());
        measure.handle_point(PlanPoint::new(3.0, 4.0, 0.0));
        assert_eq!(measure.distance(), Some(5.0));

        // A third click starts a fresh measurement.
        measure.handle_point(PlanPoint::new(10.0, 0.0, 0.0));
        assert!(measure.distance().is_none());
    }
}
