///
/// Odometer over the cross product of per-axis node choices. The last axis varies
/// fastest; with zero axes the single empty combination is produced.
///
#[derive(Clone, Debug)]
pub struct NodeCombinationIterator
{
    nodes_per_axis: Vec<usize>,
    index_head: Vec<usize>,
    first: bool,
    done: bool,
}

impl NodeCombinationIterator
{
    pub fn new(nodes_per_axis: &[usize]) -> Self
    {
        let done = nodes_per_axis.iter().any(|&n| n == 0);
        Self { nodes_per_axis: nodes_per_axis.to_owned(), index_head: vec![0; nodes_per_axis.len()], first: true, done }
    }

    /// Total number of combinations.
    pub fn num_combinations(&self) -> usize
    {
        self.nodes_per_axis.iter().product()
    }
}

impl Iterator for NodeCombinationIterator
{
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done
        {
            return None;
        }
        if self.first
        {
            self.first = false;
            return Some(self.index_head.clone());
        }
        for dim in (0..self.index_head.len()).rev()
        {
            self.index_head[dim] += 1;
            if self.index_head[dim] < self.nodes_per_axis[dim]
            {
                return Some(self.index_head.clone());
            }
            self.index_head[dim] = 0;
        }
        self.done = true;
        None
    }
}

#[test]
fn enumerates_the_cross_product()
{
    let combinations: Vec<_> = NodeCombinationIterator::new(&[2, 1, 2]).collect();
    assert_eq!(combinations, vec![vec![0, 0, 0], vec![0, 0, 1], vec![1, 0, 0], vec![1, 0, 1]]);
}

#[test]
fn combination_counts()
{
    for ndim in 0..5
    {
        let iterator = NodeCombinationIterator::new(&vec![2; ndim]);
        assert_eq!(iterator.num_combinations(), 1 << ndim);
        assert_eq!(iterator.count(), 1 << ndim);
    }
    assert_eq!(NodeCombinationIterator::new(&[]).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
    assert_eq!(NodeCombinationIterator::new(&[3, 0]).count(), 0);
}
