use detpost::{
    nms_states, BBox, DetPostError, Detection, Detections, NmsParams, RecordState, Tensor,
    TensorView,
};

#[test]
fn tensor_view_rejects_mismatched_buffer() {
    let data = [0.0f32; 5];
    let shape = [2usize, 3];

    let err = TensorView::from_slice(&data, &shape).err().unwrap();
    assert_eq!(err, DetPostError::BufferTooSmall { needed: 6, got: 5 });

    let long = [0.0f32; 7];
    let err = TensorView::from_slice(&long, &shape).err().unwrap();
    assert_eq!(err, DetPostError::BufferTooSmall { needed: 6, got: 7 });
}

#[test]
fn tensor_view_rejects_rank_zero() {
    let err = TensorView::from_slice(&[], &[]).err().unwrap();
    assert!(matches!(err, DetPostError::InvalidShape { .. }));
}

#[test]
fn tensor_view_indexing_matches_row_major_layout() {
    let data: Vec<f32> = (0..24).map(|v| v as f32).collect();
    let shape = [1usize, 2, 3, 4];
    let view = TensorView::from_slice(&data, &shape).unwrap();

    assert_eq!(view.rank(), 4);
    assert_eq!(view.len(), 24);
    assert_eq!(view.offset(&[0, 1, 2, 3]), Some(23));
    assert_eq!(view.offset(&[0, 1]), Some(12));
    assert_eq!(view.get(&[0, 1, 0, 2]).copied(), Some(14.0));
    assert!(view.get(&[0, 1, 0]).is_none());
    assert!(view.get(&[0, 2, 0, 0]).is_none());

    assert_eq!(view.lane(&[0, 0, 1]).unwrap(), &[4.0, 5.0, 6.0, 7.0]);
    assert_eq!(view.lane(&[0, 1]).unwrap().len(), 12);
    assert!(view.lane(&[0, 0, 3]).is_none());
}

#[test]
fn owned_tensor_lane_mut_writes_through() {
    let mut tensor = Tensor::zeros(&[1, 2, 6]).unwrap();
    tensor
        .lane_mut(&[0, 1])
        .unwrap()
        .copy_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    assert_eq!(tensor.view().get(&[0, 1, 5]).copied(), Some(6.0));
    assert_eq!(tensor.view().get(&[0, 0, 5]).copied(), Some(0.0));
    assert_eq!(Tensor::from_view(tensor.view()), tensor);
}

#[test]
fn empty_tensor_is_allowed() {
    let tensor = Tensor::zeros(&[1, 0, 6]).unwrap();
    assert!(tensor.is_empty());
    assert_eq!(tensor.shape(), &[1, 0, 6]);
}

#[test]
fn detections_round_trip_legacy_scores() {
    let rows = [
        0.1f32, 0.2, 0.3, 0.4, 0.0, 0.9, //
        0.5, 0.5, 0.1, 0.1, 2.0, -1.0, //
        0.0, 0.0, 1.0, 1.0, 1.0, 0.0,
    ];
    let shape = [1usize, 3, 6];
    let view = TensorView::from_slice(&rows, &shape).unwrap();
    let dets = Detections::from_tensor(view).unwrap();

    assert_eq!(dets.len(), 3);
    assert_eq!(
        dets.states(),
        &[
            RecordState::Active(0.9),
            RecordState::FilteredOut,
            RecordState::Suppressed
        ]
    );
    assert_eq!(dets.records()[1].class_id, 2);
    assert_eq!(dets.to_tensor().as_slice(), &rows);
}

#[test]
fn suppressed_states_survive_tensor_round_trip() {
    let record = |score| Detection {
        bbox: BBox::new(0.0, 0.0, 0.5, 0.5),
        class_id: 0,
        score,
    };
    let dets = Detections::from_records(vec![record(0.9), record(0.8)]);
    let states = nms_states(&dets, &NmsParams::default());
    assert_eq!(
        states.states(),
        &[RecordState::Active(0.9), RecordState::Suppressed]
    );

    let exported = states.to_tensor();
    let back = Detections::from_tensor(exported.view()).unwrap();
    assert_eq!(back.states(), states.states());
    assert_eq!(back.active().len(), 1);
}

#[test]
fn detections_from_tensor_rejects_bad_layout() {
    let data = [0.0f32; 10];
    let shape = [1usize, 2, 5];
    let view = TensorView::from_slice(&data, &shape).unwrap();
    assert!(matches!(
        Detections::from_tensor(view).err().unwrap(),
        DetPostError::InvalidShape { .. }
    ));
}

#[test]
fn record_state_legacy_encoding() {
    assert_eq!(RecordState::Active(0.25).legacy_score(), 0.25);
    assert_eq!(RecordState::Suppressed.legacy_score(), 0.0);
    assert_eq!(RecordState::FilteredOut.legacy_score(), -1.0);
    assert_eq!(RecordState::Suppressed.score(), None);
}

#[test]
fn detection_row_layout() {
    let det = Detection {
        bbox: BBox::new(0.1, 0.2, 0.3, 0.4),
        class_id: 3,
        score: 0.75,
    };
    assert_eq!(det.to_row(), [0.1, 0.2, 0.3, 0.4, 3.0, 0.75]);
}
