//! Sort methods and key selection for the list panels.
//!
//! Each sortable list has a sort-method enumeration. The view stores the
//! user's choice as a raw index; [`SortMethod::from_index`] turns it back
//! into the enumeration and rejects anything out of range. Every method
//! maps to a key extractor, and sorting is always stable in both directions.
//!
//! Names compare case-insensitively, with an ordinal tie-break between
//! names that differ only in case. See [`compare_names`].

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::{Result, SyncError};
use crate::model::{PackageInfo, ReleaseInfo};
use crate::view::{ListType, ListView};

/// A sort key extracted from a record.
///
/// Keys of one sort method are always the same variant. `Text` keys order
/// by [`compare_names`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey<'a> {
    Text(&'a str),
    Ticks(i64),
}

impl Ord for SortKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => compare_names(a, b),
            (SortKey::Ticks(a), SortKey::Ticks(b)) => a.cmp(b),
            (SortKey::Text(_), SortKey::Ticks(_)) => Ordering::Less,
            (SortKey::Ticks(_), SortKey::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for SortKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two display names ignoring case.
///
/// Names equal under case folding fall back to ordinal order, so only
/// identical names compare `Equal`.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    folded(a).cmp(&folded(b)).then_with(|| a.cmp(b))
}

/// The `(method, descending)` pair a list currently sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub method: usize,
    pub descending: bool,
}

impl SortSpec {
    /// Read the current sort state of `list`.
    pub fn of(list: &dyn ListView) -> Self {
        Self {
            method: list.sort_method(),
            descending: list.sort_descending(),
        }
    }
}

/// A sort-method enumeration for one list type.
pub trait SortMethod: Copy + Sized + 'static {
    /// The record type the list displays.
    type Item;

    /// The list this enumeration belongs to.
    const LIST: ListType;

    /// Every method, in index order.
    const ALL: &'static [Self];

    /// Caption for the sort-method picker.
    fn caption(self) -> &'static str;

    /// Extract this method's key from `item`.
    fn key(self, item: &Self::Item) -> SortKey<'_>;

    /// Map a raw index from the view back to a method.
    fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| SyncError::unknown_sort_method(Self::LIST, index))
    }

    /// Captions for every method, in index order.
    fn captions() -> Vec<String> {
        Self::ALL.iter().map(|m| m.caption().to_string()).collect()
    }
}

/// How the release list can be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleasesSortMethod {
    Name,
    FileModificationDate,
    Size,
    ReleaseDate,
}

impl ReleasesSortMethod {
    pub const ALL: [ReleasesSortMethod; 4] = [
        ReleasesSortMethod::Name,
        ReleasesSortMethod::FileModificationDate,
        ReleasesSortMethod::Size,
        ReleasesSortMethod::ReleaseDate,
    ];

    pub fn caption(self) -> &'static str {
        match self {
            ReleasesSortMethod::Name => "Order By Name",
            ReleasesSortMethod::FileModificationDate => "Order By File Modification Time",
            ReleasesSortMethod::Size => "Order By Size",
            ReleasesSortMethod::ReleaseDate => "Order By Release Date",
        }
    }
}

impl SortMethod for ReleasesSortMethod {
    type Item = ReleaseInfo;
    const LIST: ListType = ListType::Release;
    const ALL: &'static [Self] = &ReleasesSortMethod::ALL;

    fn caption(self) -> &'static str {
        ReleasesSortMethod::caption(self)
    }

    fn key(self, info: &ReleaseInfo) -> SortKey<'_> {
        match self {
            ReleasesSortMethod::Name => SortKey::Text(&info.name),
            ReleasesSortMethod::FileModificationDate => {
                SortKey::Ticks(info.file_modification_date_ticks)
            }
            ReleasesSortMethod::Size => SortKey::Ticks(info.compressed_size),
            ReleasesSortMethod::ReleaseDate => {
                SortKey::Ticks(info.asset_store_info.publish_date_ticks)
            }
        }
    }
}

impl TryFrom<usize> for ReleasesSortMethod {
    type Error = SyncError;

    fn try_from(index: usize) -> Result<Self> {
        <Self as SortMethod>::from_index(index)
    }
}

/// How the package list can be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackagesSortMethod {
    Name,
    InstallDate,
    ReleasePublishDate,
}

impl PackagesSortMethod {
    pub const ALL: [PackagesSortMethod; 3] = [
        PackagesSortMethod::Name,
        PackagesSortMethod::InstallDate,
        PackagesSortMethod::ReleasePublishDate,
    ];

    pub fn caption(self) -> &'static str {
        match self {
            PackagesSortMethod::Name => "Order By Name",
            PackagesSortMethod::InstallDate => "Order By Install Date",
            PackagesSortMethod::ReleasePublishDate => "Order By Release Publish Date",
        }
    }
}

impl SortMethod for PackagesSortMethod {
    type Item = PackageInfo;
    const LIST: ListType = ListType::Package;
    const ALL: &'static [Self] = &PackagesSortMethod::ALL;

    fn caption(self) -> &'static str {
        PackagesSortMethod::caption(self)
    }

    fn key(self, info: &PackageInfo) -> SortKey<'_> {
        match self {
            PackagesSortMethod::Name => SortKey::Text(&info.name),
            PackagesSortMethod::InstallDate => SortKey::Ticks(info.install_info.install_date_ticks),
            PackagesSortMethod::ReleasePublishDate => SortKey::Ticks(
                info.install_info
                    .release_info
                    .asset_store_info
                    .publish_date_ticks,
            ),
        }
    }
}

impl TryFrom<usize> for PackagesSortMethod {
    type Error = SyncError;

    fn try_from(index: usize) -> Result<Self> {
        <Self as SortMethod>::from_index(index)
    }
}

fn directed(ordering: Ordering, descending: bool) -> Ordering {
    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

/// Stable sort of shared records by `method`.
pub fn order_by_method<M: SortMethod>(items: &mut [Arc<M::Item>], method: M, descending: bool) {
    items.sort_by(|a, b| directed(method.key(a).cmp(&method.key(b)), descending));
}

/// Sort releases by `spec`.
pub fn order_releases(releases: &mut [Arc<ReleaseInfo>], spec: SortSpec) -> Result<()> {
    let method = ReleasesSortMethod::try_from(spec.method)?;
    order_by_method(releases, method, spec.descending);
    Ok(())
}

/// Sort packages by `spec`.
pub fn order_packages(packages: &mut [Arc<PackageInfo>], spec: SortSpec) -> Result<()> {
    let method = PackagesSortMethod::try_from(spec.method)?;
    order_by_method(packages, method, spec.descending);
    Ok(())
}

/// Stable sort of project item names.
pub fn order_names(names: &mut [String], descending: bool) {
    names.sort_by(|a, b| directed(compare_names(a, b), descending));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(name: &str, size: i64) -> Arc<ReleaseInfo> {
        let mut info = ReleaseInfo::new(name.to_lowercase(), name);
        info.compressed_size = size;
        Arc::new(info)
    }

    fn names(items: &[Arc<ReleaseInfo>]) -> Vec<&str> {
        items.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_from_index_rejects_out_of_range() {
        for (index, method) in ReleasesSortMethod::ALL.iter().enumerate() {
            assert_eq!(ReleasesSortMethod::from_index(index).unwrap(), *method);
        }
        for (index, method) in PackagesSortMethod::ALL.iter().enumerate() {
            assert_eq!(PackagesSortMethod::from_index(index).unwrap(), *method);
        }

        let err = PackagesSortMethod::from_index(3).unwrap_err();
        assert!(matches!(
            err,
            SyncError::UnknownSortMethod {
                list: ListType::Package,
                value: 3
            }
        ));
        assert!(ReleasesSortMethod::from_index(4).is_err());
        assert!(ReleasesSortMethod::from_index(usize::MAX).is_err());
    }

    #[test]
    fn test_captions_follow_enum_order() {
        assert_eq!(
            ReleasesSortMethod::captions(),
            vec![
                "Order By Name",
                "Order By File Modification Time",
                "Order By Size",
                "Order By Release Date",
            ]
        );
        assert_eq!(
            PackagesSortMethod::captions(),
            vec![
                "Order By Name",
                "Order By Install Date",
                "Order By Release Publish Date",
            ]
        );
    }

    #[test]
    fn test_order_releases_by_each_method() {
        let mut a = ReleaseInfo::new("a", "Alpha");
        a.file_modification_date_ticks = 30;
        a.compressed_size = 1;
        a.asset_store_info.publish_date_ticks = 200;
        let mut b = ReleaseInfo::new("b", "Beta");
        b.file_modification_date_ticks = 10;
        b.compressed_size = 3;
        b.asset_store_info.publish_date_ticks = 100;
        let mut c = ReleaseInfo::new("c", "Gamma");
        c.file_modification_date_ticks = 20;
        c.compressed_size = 2;
        c.asset_store_info.publish_date_ticks = 300;
        let source = vec![Arc::new(b), Arc::new(c), Arc::new(a)];

        let expect = [
            (ReleasesSortMethod::Name, vec!["Alpha", "Beta", "Gamma"]),
            (ReleasesSortMethod::FileModificationDate, vec!["Beta", "Gamma", "Alpha"]),
            (ReleasesSortMethod::Size, vec!["Alpha", "Gamma", "Beta"]),
            (ReleasesSortMethod::ReleaseDate, vec!["Beta", "Alpha", "Gamma"]),
        ];
        for (method, expected) in expect {
            let mut items = source.clone();
            order_by_method(&mut items, method, false);
            assert_eq!(names(&items), expected, "{method:?}");
        }
    }

    #[test]
    fn test_order_packages_by_nested_keys() {
        let mut early = ReleaseInfo::new("r1", "R1");
        early.asset_store_info.publish_date_ticks = 5;
        let mut late = ReleaseInfo::new("r2", "R2");
        late.asset_store_info.publish_date_ticks = 50;

        let mut items = vec![
            Arc::new(PackageInfo::new("Zed").installed_from(early, 900)),
            Arc::new(PackageInfo::new("Amp").installed_from(late, 100)),
        ];

        order_by_method(&mut items, PackagesSortMethod::InstallDate, false);
        assert_eq!(items[0].name, "Amp");

        order_by_method(&mut items, PackagesSortMethod::ReleasePublishDate, false);
        assert_eq!(items[0].name, "Zed");

        order_by_method(&mut items, PackagesSortMethod::Name, true);
        assert_eq!(items[0].name, "Zed");
    }

    #[test]
    fn test_descending_is_stable_for_equal_keys() {
        let mut items = vec![release("A", 1), release("B", 2), release("C", 1), release("D", 2)];

        order_by_method(&mut items, ReleasesSortMethod::Size, true);
        assert_eq!(names(&items), vec!["B", "D", "A", "C"]);

        order_by_method(&mut items, ReleasesSortMethod::Size, false);
        assert_eq!(names(&items), vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_order_releases_rejects_unknown_method() {
        let mut items = vec![release("A", 1)];
        let err = order_releases(
            &mut items,
            SortSpec {
                method: 9,
                descending: false,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SyncError::UnknownSortMethod {
                list: ListType::Release,
                value: 9
            }
        ));
        assert!(ReleasesSortMethod::try_from(2).is_ok());
        assert!(PackagesSortMethod::try_from(2).is_ok());
    }

    #[test]
    fn test_order_names() {
        let mut items = vec!["b".to_string(), "c".to_string(), "a".to_string()];
        order_names(&mut items, false);
        assert_eq!(items, vec!["a", "b", "c"]);
        order_names(&mut items, true);
        assert_eq!(items, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_names_ignore_case() {
        let mut items: Vec<String> = ["zenject", "Assets", "bolt", "UniRx"]
            .into_iter()
            .map(String::from)
            .collect();
        order_names(&mut items, false);
        assert_eq!(items, vec!["Assets", "bolt", "UniRx", "zenject"]);

        let mut releases = vec![release("beta", 0), release("Alpha", 0), release("Gamma", 0)];
        order_by_method(&mut releases, ReleasesSortMethod::Name, false);
        assert_eq!(names(&releases), vec!["Alpha", "beta", "Gamma"]);
    }

    #[test]
    fn test_case_only_difference_is_ordinal() {
        assert_eq!(compare_names("Bolt", "bolt"), Ordering::Less);
        assert_eq!(compare_names("bolt", "BOLT"), Ordering::Greater);
        assert_eq!(compare_names("bolt", "bolt"), Ordering::Equal);
        assert_eq!(compare_names("", "a"), Ordering::Less);
        assert!(SortKey::Text("apple") < SortKey::Text("Banana"));
    }
}
