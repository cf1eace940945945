use tracklets::{EdgeList, Error, extract_tracklets};

#[test]
fn rows_must_have_two_columns() {
    let ok = EdgeList::from_rows(vec![vec![1, 2], vec![2, 3]]).unwrap();
    assert_eq!(ok.as_slice(), &[(1, 2), (2, 3)]);

    let err = EdgeList::from_rows(vec![vec![1, 2], vec![2, 3, 4]]).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidInput {
            message: "row 1 has 3 columns, expected 2".to_string(),
        }
    );

    assert!(EdgeList::<u32>::from_rows(vec![vec![1]]).is_err());
    assert!(EdgeList::<u32>::from_rows(vec![vec![]]).is_err());
}

#[test]
fn flat_buffers_need_an_n_by_2_shape() {
    let edges = EdgeList::from_flat(vec![1, 2, 2, 3], &[2, 2]).unwrap();
    assert_eq!(edges.as_slice(), &[(1, 2), (2, 3)]);

    assert!(EdgeList::from_flat(vec![1, 2, 3], &[3]).is_err());
    assert!(EdgeList::from_flat(vec![1, 2, 3], &[1, 3]).is_err());
    assert!(EdgeList::from_flat(vec![1, 2, 3, 4], &[1, 2, 2]).is_err());
    assert!(EdgeList::from_flat(vec![1, 2, 3, 4], &[3, 2]).is_err());
}

#[test]
fn oversized_shapes_are_rejected() {
    let err = EdgeList::from_flat(vec![1, 2], &[usize::MAX, 2]).unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));

    let err = EdgeList::<u32>::from_flat(Vec::new(), &[usize::MAX / 2 + 1, 2]).unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[test]
fn empty_tables_are_valid() {
    let rows = EdgeList::<u32>::from_rows(Vec::new()).unwrap();
    assert!(rows.is_empty());

    let flat = EdgeList::<u32>::from_flat(Vec::new(), &[0, 2]).unwrap();
    assert!(extract_tracklets(flat.as_slice()).unwrap().is_empty());
}

#[test]
fn deserializes_from_json_pairs() {
    let edges: EdgeList<u32> = serde_json::from_str("[[1, 2], [2, 3]]").unwrap();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges, EdgeList::from(vec![[1, 2], [2, 3]]));
}
