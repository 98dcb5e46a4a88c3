use crate::error::Result;
use crate::events::{FrameHandle, FrameProperty};
use crate::host::WindowFrames;
use crate::debug_if_enabled;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// GUID встроенного diff-редактора хоста {79D52DDF-52BC-43F1-9663-B3E85CDCA55C}
pub const DIFF_EDITOR_TYPE: Uuid = Uuid::from_u128(0x79D52DDF_52BC_43F1_9663_B3E85CDCA55C);

const MONIKER_SCHEME: &str = "gitdiff:";
const MONIKER_MARKER: &str = "gitdiff";
const MONIKER_SEPARATOR: char = ';';
const MONIKER_VCS_MARKER: &str = "git";

const CAPTION_PREFIX: &str = "diff - ";
const CAPTION_MARKERS: [&str; 5] = [
    " vs ",
    "(diff)",
    "staged changes",
    "unstaged changes",
    "working tree",
];

/// Какая из эвристик признала окно diff-окном
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSignal {
    Moniker,
    Caption,
    EditorType,
}

/// Идентификатор ресурса похож на diff-документ (регистронезависимо)
pub fn moniker_indicates_diff(moniker: &str) -> bool {
    let moniker = moniker.to_lowercase();
    moniker.starts_with(MONIKER_SCHEME)
        || moniker.contains(MONIKER_MARKER)
        || (moniker.contains(MONIKER_SEPARATOR) && moniker.contains(MONIKER_VCS_MARKER))
}

/// Заголовок вкладки похож на diff (регистронезависимо)
pub fn caption_indicates_diff(caption: &str) -> bool {
    let caption = caption.to_lowercase();
    caption.starts_with(CAPTION_PREFIX)
        || CAPTION_MARKERS.iter().any(|marker| caption.contains(marker))
}

pub fn editor_type_indicates_diff(editor_type: &Uuid) -> bool {
    *editor_type == DIFF_EDITOR_TYPE
}

/// Эвристический классификатор diff-окон.
///
/// Три независимые проверки по порядку: идентификатор ресурса, заголовок,
/// тип редактора. Ошибка чтения свойства делает проверку неопределённой,
/// а не проваливает классификацию целиком.
pub struct DiffClassifier {
    frames: Arc<dyn WindowFrames>,
}

impl DiffClassifier {
    pub fn new(frames: Arc<dyn WindowFrames>) -> Self {
        Self { frames }
    }

    pub fn is_diff_window(&self, frame: FrameHandle) -> bool {
        // Паника в коде хоста тоже означает "не diff"
        match catch_unwind(AssertUnwindSafe(|| self.detect(frame))) {
            Ok(Some(signal)) => {
                debug!("Окно {} распознано как diff по признаку {:?}", frame, signal);
                true
            }
            Ok(None) => false,
            Err(_) => {
                warn!("Классификация окна {} прервана паникой, считаем не diff", frame);
                false
            }
        }
    }

    /// Первый сработавший признак diff-окна
    pub fn detect(&self, frame: FrameHandle) -> Option<DiffSignal> {
        if let Some(moniker) = self.non_empty_string(frame, FrameProperty::Moniker) {
            if moniker_indicates_diff(&moniker) {
                return Some(DiffSignal::Moniker);
            }
        }

        if let Some(caption) = self.non_empty_string(frame, FrameProperty::Caption) {
            if caption_indicates_diff(&caption) {
                return Some(DiffSignal::Caption);
            }
        }

        match self.fetch(frame, FrameProperty::EditorType, |frames| {
            frames.guid_property(frame, FrameProperty::EditorType)
        }) {
            Some(editor_type) if editor_type_indicates_diff(&editor_type) => {
                Some(DiffSignal::EditorType)
            }
            _ => None,
        }
    }

    fn non_empty_string(&self, frame: FrameHandle, property: FrameProperty) -> Option<String> {
        self.fetch(frame, property, |frames| frames.string_property(frame, property))
            .filter(|value| !value.is_empty())
    }

    /// Чтение одного свойства: ошибка или паника хоста делают проверку неопределённой
    fn fetch<T>(
        &self,
        frame: FrameHandle,
        property: FrameProperty,
        query: impl FnOnce(&dyn WindowFrames) -> Result<Option<T>>,
    ) -> Option<T> {
        match catch_unwind(AssertUnwindSafe(|| query(self.frames.as_ref()))) {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                debug_if_enabled!("Свойство {:?} окна {} недоступно: {}", property, frame, e);
                None
            }
            Err(_) => {
                warn!("Чтение свойства {:?} окна {} прервано паникой", property, frame);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutoCloseError;
    use crate::events::SaveMode;
    use crate::host::{DryRunHost, FrameRecord};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Хост, у которого чтение строковых свойств всегда падает
    struct BrokenStrings {
        editor_type: Option<Uuid>,
    }

    impl WindowFrames for BrokenStrings {
        fn string_property(&self, _frame: FrameHandle, _property: FrameProperty) -> Result<Option<String>> {
            Err(crate::autoclose_error!(host_call, "GetProperty", 0x8000_4005_u32 as i32))
        }

        fn guid_property(&self, _frame: FrameHandle, _property: FrameProperty) -> Result<Option<Uuid>> {
            Ok(self.editor_type)
        }

        fn close_frame(&self, frame: FrameHandle, _mode: SaveMode) -> Result<()> {
            AutoCloseError::frame_not_found(frame)
        }
    }

    /// Хост, который паникует при чтении выбранных свойств и считает вызовы
    struct PanickingFrames {
        panics_on: Vec<FrameProperty>,
        caption: Option<String>,
        calls: AtomicUsize,
    }

    impl PanickingFrames {
        fn new(panics_on: Vec<FrameProperty>, caption: Option<&str>) -> Self {
            Self {
                panics_on,
                caption: caption.map(str::to_string),
                calls: AtomicUsize::new(0),
            }
        }

        fn query(&self, property: FrameProperty) {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.panics_on.contains(&property) {
                panic!("property {:?} is gone", property);
            }
        }
    }

    impl WindowFrames for PanickingFrames {
        fn string_property(&self, _frame: FrameHandle, property: FrameProperty) -> Result<Option<String>> {
            self.query(property);
            match property {
                FrameProperty::Caption => Ok(self.caption.clone()),
                _ => Ok(None),
            }
        }

        fn guid_property(&self, _frame: FrameHandle, property: FrameProperty) -> Result<Option<Uuid>> {
            self.query(property);
            Ok(Some(DIFF_EDITOR_TYPE))
        }

        fn close_frame(&self, _frame: FrameHandle, _mode: SaveMode) -> Result<()> {
            panic!("frame is gone");
        }
    }

    fn classify(record: FrameRecord) -> bool {
        let host = Arc::new(DryRunHost::new());
        let frame = host.open_frame(record);
        DiffClassifier::new(host).is_diff_window(frame)
    }

    #[test]
    fn test_moniker_scheme_prefix() {
        let record = FrameRecord {
            moniker: Some("gitdiff://repo/file.cs".to_string()),
            ..FrameRecord::default()
        };
        assert!(classify(record));
        assert!(moniker_indicates_diff("GitDiff://Repo/File.cs"));
    }

    #[test]
    fn test_caption_prefix_without_moniker() {
        assert!(classify(FrameRecord::new("Diff - main.cs")));
    }

    #[test]
    fn test_separator_and_vcs_marker_in_moniker() {
        let record = FrameRecord {
            moniker: Some("C:\\work;gitstatus".to_string()),
            ..FrameRecord::default()
        };
        assert!(classify(record));
        // Разделитель без маркера VCS не считается
        assert!(!moniker_indicates_diff("C:\\work;status"));
    }

    #[test]
    fn test_editor_type_when_string_checks_inconclusive() {
        let frames = Arc::new(BrokenStrings {
            editor_type: Some(Uuid::from_u128(0x79d52ddf_52bc_43f1_9663_b3e85cdca55c)),
        });
        let classifier = DiffClassifier::new(frames);

        assert_eq!(classifier.detect(FrameHandle::new(1)), Some(DiffSignal::EditorType));
        assert!(classifier.is_diff_window(FrameHandle::new(1)));
    }

    #[test]
    fn test_regular_source_window_is_not_diff() {
        let record = FrameRecord::new("main.rs")
            .with_moniker("C:\\src\\app\\main.rs")
            .with_editor_type(Uuid::from_u128(0x8b382828_6202_11d1_8870_0000f87579d2));
        assert!(!classify(record));
    }

    #[test]
    fn test_caption_markers() {
        assert!(caption_indicates_diff("main.rs vs main.rs"));
        assert!(caption_indicates_diff("main.rs (Diff)"));
        assert!(caption_indicates_diff("main.rs - Staged Changes"));
        assert!(caption_indicates_diff("main.rs - UNSTAGED CHANGES"));
        assert!(caption_indicates_diff("main.rs (Working Tree)"));
        assert!(!caption_indicates_diff("diff.rs"));
        assert!(!caption_indicates_diff("versions.md"));
    }

    #[test]
    fn test_empty_strings_are_inconclusive() {
        let record = FrameRecord {
            caption: Some(String::new()),
            moniker: Some(String::new()),
            editor_type: None,
        };
        assert!(!classify(record));
    }

    #[test]
    fn test_failed_fetches_fall_through_to_false() {
        let classifier = DiffClassifier::new(Arc::new(BrokenStrings { editor_type: None }));
        assert!(!classifier.is_diff_window(FrameHandle::new(1)));

        // Окно, которого нет в хосте
        let classifier = DiffClassifier::new(Arc::new(DryRunHost::new()));
        assert!(!classifier.is_diff_window(FrameHandle::new(404)));
    }

    #[test]
    fn test_panicking_moniker_falls_through_to_caption() {
        let frames = Arc::new(PanickingFrames::new(vec![FrameProperty::Moniker], Some("Diff - main.cs")));
        let classifier = DiffClassifier::new(frames.clone());

        assert_eq!(classifier.detect(FrameHandle::new(1)), Some(DiffSignal::Caption));
        assert!(classifier.is_diff_window(FrameHandle::new(1)));
    }

    #[test]
    fn test_panicking_strings_fall_through_to_editor_type() {
        let frames = Arc::new(PanickingFrames::new(
            vec![FrameProperty::Moniker, FrameProperty::Caption],
            None,
        ));
        let classifier = DiffClassifier::new(frames.clone());

        assert!(classifier.is_diff_window(FrameHandle::new(1)));
        assert_eq!(frames.calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_panic_on_every_property_means_not_diff() {
        let frames = Arc::new(PanickingFrames::new(
            vec![FrameProperty::Moniker, FrameProperty::Caption, FrameProperty::EditorType],
            Some("Diff - main.cs"),
        ));
        let classifier = DiffClassifier::new(frames.clone());

        assert!(!classifier.is_diff_window(FrameHandle::new(1)));
        assert_eq!(frames.calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let host = Arc::new(DryRunHost::new());
        let diff = host.open_frame(FrameRecord::new("a.rs vs b.rs"));
        let plain = host.open_frame(FrameRecord::new("a.rs"));
        let classifier = DiffClassifier::new(host.clone());

        assert_eq!(classifier.is_diff_window(diff), classifier.is_diff_window(diff));
        assert_eq!(classifier.is_diff_window(plain), classifier.is_diff_window(plain));
        assert!(host.is_open(diff) && host.is_open(plain));
        assert!(host.closed_frames().is_empty());
    }
}
