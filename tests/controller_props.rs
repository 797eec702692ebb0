//! Property-based tests for camera selection and capture geometry
//!
//! These tests verify invariants of the controller's synchronous logic
//! using proptest for input generation and shrinking.

use camswitch::platform::MemoryPreferenceStore;
use camswitch::testing::{MockDeviceDirectory, MockStreamProvider, MockViewport};
use camswitch::{
    CameraController, CaptureDevice, ControllerConfig, DeviceKind, FacingMode, PreferenceStore,
    SnapshotGeometry, MAX_CANVAS_DIMENSION,
};
use proptest::prelude::*;
use std::sync::Arc;

type TestController = CameraController<MockDeviceDirectory, MockStreamProvider, MockViewport>;

fn controller(facing_mode: FacingMode, store: Arc<MemoryPreferenceStore>) -> TestController {
    CameraController::new(
        MockDeviceDirectory::new(Vec::new()),
        MockStreamProvider::default(),
        MockViewport::default(),
        ControllerConfig::default().with_facing_mode(facing_mode),
    )
    .unwrap()
    .with_preferences(store)
}

fn facing_mode() -> impl Strategy<Value = FacingMode> {
    prop_oneof![Just(FacingMode::Front), Just(FacingMode::Rear)]
}

fn non_video_kind() -> impl Strategy<Value = DeviceKind> {
    prop_oneof![Just(DeviceKind::AudioInput), Just(DeviceKind::AudioOutput)]
}

fn device(kind: DeviceKind) -> impl Strategy<Value = CaptureDevice> {
    ("[a-z0-9]{1,12}", "[A-Za-z ()]{0,24}")
        .prop_map(move |(id, label)| CaptureDevice::new(id.clone(), id, kind, label))
}

proptest! {
    /// INVARIANT: a single video input forces the front facing mode
    #[test]
    fn single_video_input_forces_front(
        initial in facing_mode(),
        camera in device(DeviceKind::VideoInput),
        others in prop::collection::vec(non_video_kind().prop_flat_map(device), 0..5),
    ) {
        let mut ctl = controller(initial, Arc::new(MemoryPreferenceStore::new()));
        let mut all = others;
        all.push(camera);

        let list_len = ctl.update_device_list(&all).len();

        prop_assert_eq!(list_len, 1);
        prop_assert_eq!(ctl.facing_mode(), FacingMode::Front);
    }

    /// INVARIANT: constraints select by exact id or by facing mode, never both
    #[test]
    fn constraints_carry_exactly_one_selector(
        mode in facing_mode(),
        selected in "[a-z0-9-]{0,16}",
    ) {
        let mut ctl = controller(mode, Arc::new(MemoryPreferenceStore::new()));
        ctl.set_selected_device_id(selected.clone());

        let constraints = ctl.build_constraints();

        prop_assert!(constraints.exact_device_id().is_some() != constraints.facing_mode().is_some());
        if selected.is_empty() {
            prop_assert_eq!(constraints.facing_mode(), Some(mode));
        } else {
            prop_assert_eq!(constraints.exact_device_id(), Some(selected.as_str()));
        }
        prop_assert!(!constraints.audio);
    }

    /// INVARIANT: flipping twice restores the facing mode
    #[test]
    fn flip_is_an_involution(mode in facing_mode()) {
        let mut ctl = controller(mode, Arc::new(MemoryPreferenceStore::new()));
        ctl.flip();
        prop_assert_eq!(ctl.facing_mode(), mode.toggled());
        ctl.flip();
        prop_assert_eq!(ctl.facing_mode(), mode);
    }

    /// INVARIANT: a remembered id is adopted verbatim regardless of labels
    #[test]
    fn remembered_id_beats_heuristic(
        mode in facing_mode(),
        remembered in "[a-z0-9-]{1,16}",
        devices in prop::collection::vec(device(DeviceKind::VideoInput), 0..6),
    ) {
        let store = Arc::new(MemoryPreferenceStore::new());
        store.set("webcam-device-id", &remembered).unwrap();
        let mut ctl = controller(mode, store);
        ctl.update_device_list(&devices);

        ctl.select_camera();

        prop_assert_eq!(ctl.selected_device_id(), remembered.as_str());
    }

    /// INVARIANT: the heuristic picks the first label mentioning the direction
    #[test]
    fn heuristic_picks_first_match(
        devices in prop::collection::vec(device(DeviceKind::VideoInput), 2..6),
        mode in facing_mode(),
    ) {
        let mut ctl = controller(mode, Arc::new(MemoryPreferenceStore::new()));
        ctl.update_device_list(&devices);
        let mode = ctl.facing_mode();

        ctl.select_camera();

        let expected = devices
            .iter()
            .find(|d| d.label.to_lowercase().contains(mode.label_hint()))
            .map(|d| d.id.as_str())
            .unwrap_or("");
        prop_assert_eq!(ctl.selected_device_id(), expected);
    }

    /// INVARIANT: the scaled frame fills the canvas width and is centred vertically,
    /// and surfaces beyond the size limit are refused
    #[test]
    fn snapshot_frame_is_centred(
        width in 1u32..4096,
        height in 1u32..4096,
        displayed in 1.0f64..2000.0,
    ) {
        let needed_height = displayed.trunc() * height as f64 / width as f64;
        let g = match SnapshotGeometry::compute(width, height, displayed) {
            Ok(g) => g,
            Err(_) => {
                prop_assert!(needed_height > MAX_CANVAS_DIMENSION as f64 - 1.0);
                return Ok(());
            }
        };

        prop_assert!(g.canvas_height <= MAX_CANVAS_DIMENSION);
        prop_assert_eq!(g.destination.x, 0.0);
        prop_assert_eq!(g.destination.width, g.canvas_width as f64);
        let top = g.destination.y;
        let bottom = g.canvas_height as f64 - (g.destination.y + g.destination.height);
        prop_assert!((top - bottom).abs() < 1e-6);
        prop_assert!(g.destination.y.abs() <= 0.5 + 1e-9);
    }
}
